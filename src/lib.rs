//! portfolio-world - action worlds and outcome statistics for solver portfolios
//!
//! A portfolio scheduler picks, per task, a sequence of (solver, budget)
//! actions. This crate builds that action space from a request and harvests,
//! for every action, per-task counts of solved and unsolved outcomes from the
//! history of past solver runs. Over-budget successes are censored to
//! failures, and only recyclable runs allocated at least the action's budget
//! count as evidence.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the `RunHistory` /
//!   `SolverCatalog` ports
//! - **Service Layer** (`services`): the `Trainer` and the outcome tally
//! - **Adapters** (`adapters`): SQLite and in-memory port implementations
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging, setup
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use portfolio_world::adapters::memory::{InMemoryRunHistory, StaticSolverCatalog};
//! use portfolio_world::{ActionRequest, Trainer};
//!
//! # async fn demo(task_ids: Vec<uuid::Uuid>) -> anyhow::Result<()> {
//! let catalog = Arc::new(StaticSolverCatalog::new(["minisat", "glucose"]));
//! let history = Arc::new(InMemoryRunHistory::new());
//! let mut trainer = Trainer::new(catalog, history, task_ids);
//!
//! let actions = trainer
//!     .build_actions(&ActionRequest::new(["minisat", "glucose"], [1.0, 10.0]))
//!     .await?
//!     .to_vec();
//! let counts = trainer.get_data(&actions[0]).await?;
//! # let _ = counts;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Action, ActionRequest, Answer, Config, Outcome, OutcomeCounts, RunRecord, Solver, World,
};
pub use domain::ports::{HistoryQuery, RunHistory, SolverCatalog};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{tally_outcomes, ActionSamples, Trainer, TrainingSet};
