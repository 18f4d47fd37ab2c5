//! Domain layer for portfolio-world
//!
//! Actions, outcomes, run records and the ports the trainer reads through.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
