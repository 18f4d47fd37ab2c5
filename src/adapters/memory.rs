//! In-memory run history and solver catalog.
//!
//! Useful for embedding the trainer without a database and for tests.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::{RunRecord, Solver};
use crate::domain::ports::{HistoryQuery, RunHistory, SolverCatalog};

/// Run history held in a vector behind a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryRunHistory {
    runs: RwLock<Vec<RunRecord>>,
}

impl InMemoryRunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_runs(runs: impl IntoIterator<Item = RunRecord>) -> Self {
        Self {
            runs: RwLock::new(runs.into_iter().collect()),
        }
    }

    pub async fn insert(&self, run: RunRecord) {
        self.runs.write().await.push(run);
    }

    pub async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.runs.read().await.is_empty()
    }
}

#[async_trait]
impl RunHistory for InMemoryRunHistory {
    async fn query(&self, query: &HistoryQuery<'_>) -> DomainResult<Vec<RunRecord>> {
        let runs = self.runs.read().await;
        Ok(runs.iter().filter(|r| query.matches(r)).cloned().collect())
    }
}

/// Catalog over a fixed set of solver names.
#[derive(Debug, Clone, Default)]
pub struct StaticSolverCatalog {
    names: BTreeSet<String>,
}

impl StaticSolverCatalog {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl SolverCatalog for StaticSolverCatalog {
    async fn resolve(&self, name: &str) -> DomainResult<Option<Solver>> {
        Ok(self.names.contains(name).then(|| Solver::new(name)))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn test_query_applies_filters() {
        let task_id = Uuid::new_v4();
        let other_task = Uuid::new_v4();
        let history = InMemoryRunHistory::with_runs([
            RunRecord::new(task_id, "a", Duration::from_secs(10), Duration::from_secs(1)).recyclable(),
            RunRecord::new(task_id, "a", Duration::from_secs(10), Duration::from_secs(1)),
            RunRecord::new(task_id, "a", Duration::from_secs(2), Duration::from_secs(1)).recyclable(),
            RunRecord::new(task_id, "b", Duration::from_secs(10), Duration::from_secs(1)).recyclable(),
            RunRecord::new(other_task, "a", Duration::from_secs(10), Duration::from_secs(1)).recyclable(),
        ]);
        assert_eq!(history.len().await, 5);

        let tasks = [task_id];
        let found = history
            .query(&HistoryQuery::recyclable("a", Duration::from_secs(5), &tasks))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_static_catalog() {
        let catalog = StaticSolverCatalog::new(["foo", "bar"]);
        assert_eq!(catalog.resolve("foo").await.unwrap(), Some(Solver::new("foo")));
        assert_eq!(catalog.resolve("baz").await.unwrap(), None);
    }
}
