//! Repository port for historical solver runs.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::RunRecord;

/// Read query against the run history.
#[derive(Debug, Clone)]
pub struct HistoryQuery<'a> {
    /// Solver whose runs are wanted.
    pub solver: &'a str,
    /// Only runs allocated at least this budget.
    pub min_budget: Duration,
    /// Tasks of interest.
    pub task_ids: &'a [Uuid],
    /// Only runs flagged recyclable.
    pub recyclable_only: bool,
}

impl<'a> HistoryQuery<'a> {
    /// Recyclable runs of `solver` on `task_ids` with budget at least `min_budget`.
    pub const fn recyclable(solver: &'a str, min_budget: Duration, task_ids: &'a [Uuid]) -> Self {
        Self {
            solver,
            min_budget,
            task_ids,
            recyclable_only: true,
        }
    }

    /// Whether `record` satisfies this query's filters.
    pub fn matches(&self, record: &RunRecord) -> bool {
        record.solver == self.solver
            && record.budget >= self.min_budget
            && (record.recyclable || !self.recyclable_only)
            && self.task_ids.contains(&record.task_id)
    }
}

/// Read access to the run history store.
///
/// Implementations must give read consistency within one query: no partially
/// written runs are visible.
#[async_trait]
pub trait RunHistory: Send + Sync {
    /// Fetch every run matching `query`, in no particular order.
    async fn query(&self, query: &HistoryQuery<'_>) -> DomainResult<Vec<RunRecord>>;
}
