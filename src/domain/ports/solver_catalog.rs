//! Port for resolving solver names to solver handles.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Solver;

/// Source of known solvers, consulted when building actions.
#[async_trait]
pub trait SolverCatalog: Send + Sync {
    /// Resolve a solver by name. `Ok(None)` if no such solver is known.
    async fn resolve(&self, name: &str) -> DomainResult<Option<Solver>>;
}
