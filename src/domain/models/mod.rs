pub mod action;
pub mod config;
pub mod outcome;
pub mod run;
pub mod world;

pub use action::{budget_from_secs, Action, Solver};
pub use config::{Config, DatabaseConfig, LoggingConfig, TrainingConfig};
pub use outcome::{Outcome, OutcomeCounts};
pub use run::{Answer, RunRecord};
pub use world::{ActionRequest, World};
