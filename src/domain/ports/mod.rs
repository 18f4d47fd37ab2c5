//! Port trait definitions (Hexagonal Architecture)
//!
//! Infrastructure adapters implement these traits:
//! - RunHistory: read access to historical solver runs
//! - SolverCatalog: solver name resolution
//!
//! The trainer depends only on these contracts, never on a query language.

pub mod run_history;
pub mod solver_catalog;

pub use run_history::{HistoryQuery, RunHistory};
pub use solver_catalog::SolverCatalog;
