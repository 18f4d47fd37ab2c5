//! SQLite adapter for RunHistory and SolverCatalog.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::instrument;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_optional_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Answer, RunRecord, Solver};
use crate::domain::ports::{HistoryQuery, RunHistory, SolverCatalog};

/// Task ids bound per statement, well under SQLite's variable limit.
const MAX_TASK_IDS_PER_QUERY: usize = 500;

/// Run history and solver catalog backed by the `solver_runs` schema.
#[derive(Clone)]
pub struct SqliteRunHistory {
    pool: SqlitePool,
}

impl SqliteRunHistory {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a solver if it is not already known.
    pub async fn register_solver(&self, name: &str, kind: &str) -> DomainResult<()> {
        sqlx::query("INSERT OR IGNORE INTO solvers (name, kind) VALUES (?, ?)")
            .bind(name)
            .bind(kind)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Register a task if it is not already known.
    pub async fn register_task(
        &self,
        id: Uuid,
        name: Option<&str>,
        collection: Option<&str>,
    ) -> DomainResult<()> {
        sqlx::query("INSERT OR IGNORE INTO tasks (id, name, collection) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(name)
            .bind(collection)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Record one run, registering its solver and task on first sight.
    pub async fn insert_run(&self, run: &RunRecord) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_run_in(&mut tx, run).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Record a batch of runs atomically.
    #[instrument(skip(self, runs), fields(count = runs.len()))]
    pub async fn insert_runs(&self, runs: &[RunRecord]) -> DomainResult<usize> {
        let mut tx = self.pool.begin().await?;
        for run in runs {
            insert_run_in(&mut tx, run).await?;
        }
        tx.commit().await?;
        tracing::debug!("runs recorded");
        Ok(runs.len())
    }
}

#[derive(sqlx::FromRow)]
struct RunRow {
    id: String,
    task_id: String,
    solver_name: String,
    budget_ns: i64,
    cost_ns: i64,
    recyclable: bool,
    satisfiable: Option<bool>,
    certificate: Option<String>,
    seed: Option<i64>,
    started_at: Option<String>,
}

fn nanos_to_duration(column: &str, nanos: i64) -> DomainResult<Duration> {
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| DomainError::DataAccess(format!("negative {column}: {nanos}")))
}

/// Durations are stored at full precision; an `i64` holds about 292 years.
fn duration_to_nanos(value: Duration) -> DomainResult<i64> {
    i64::try_from(value.as_nanos())
        .map_err(|_| DomainError::DataAccess(format!("duration out of range: {value:?}")))
}

fn row_to_record(row: RunRow) -> DomainResult<RunRecord> {
    let certificate = row
        .certificate
        .map(|s| serde_json::from_str::<Vec<i64>>(&s))
        .transpose()?;

    let answer = match (row.satisfiable, certificate) {
        (Some(satisfiable), certificate) => Some(Answer {
            satisfiable,
            certificate,
        }),
        (None, None) => None,
        (None, Some(_)) => {
            return Err(DomainError::DataAccess(format!(
                "run {} has a certificate but no answer",
                row.id
            )))
        }
    };

    Ok(RunRecord {
        id: parse_uuid(&row.id)?,
        task_id: parse_uuid(&row.task_id)?,
        solver: row.solver_name,
        budget: nanos_to_duration("budget_ns", row.budget_ns)?,
        cost: nanos_to_duration("cost_ns", row.cost_ns)?,
        recyclable: row.recyclable,
        answer,
        seed: row.seed,
        started_at: parse_optional_datetime(row.started_at)?,
    })
}

async fn insert_run_in(conn: &mut SqliteConnection, run: &RunRecord) -> DomainResult<()> {
    let certificate = run
        .answer
        .as_ref()
        .and_then(|a| a.certificate.as_ref())
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DomainError::DataAccess(e.to_string()))?;

    sqlx::query("INSERT OR IGNORE INTO solvers (name) VALUES (?)")
        .bind(&run.solver)
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT OR IGNORE INTO tasks (id) VALUES (?)")
        .bind(run.task_id.to_string())
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "INSERT INTO solver_runs
         (id, task_id, solver_name, budget_ns, cost_ns, recyclable,
          satisfiable, certificate, seed, started_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
    )
    .bind(run.id.to_string())
    .bind(run.task_id.to_string())
    .bind(&run.solver)
    .bind(duration_to_nanos(run.budget)?)
    .bind(duration_to_nanos(run.cost)?)
    .bind(run.recyclable)
    .bind(run.answer.as_ref().map(|a| a.satisfiable))
    .bind(certificate)
    .bind(run.seed)
    .bind(run.started_at.map(|dt| dt.to_rfc3339()))
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[async_trait]
impl RunHistory for SqliteRunHistory {
    /// Chunks run inside one transaction so the whole query sees one snapshot.
    #[instrument(skip(self, query), fields(solver = query.solver, tasks = query.task_ids.len()))]
    async fn query(&self, query: &HistoryQuery<'_>) -> DomainResult<Vec<RunRecord>> {
        if query.task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let min_budget_ns = duration_to_nanos(query.min_budget)?;
        let mut tx = self.pool.begin().await?;
        let mut records = Vec::new();

        for chunk in query.task_ids.chunks(MAX_TASK_IDS_PER_QUERY) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "SELECT id, task_id, solver_name, budget_ns, cost_ns, recyclable,
                        satisfiable, certificate, seed, started_at
                 FROM solver_runs WHERE solver_name = ",
            );
            builder.push_bind(query.solver.to_string());
            builder.push(" AND budget_ns >= ");
            builder.push_bind(min_budget_ns);
            if query.recyclable_only {
                builder.push(" AND recyclable = 1");
            }
            builder.push(" AND task_id IN (");
            let mut ids = builder.separated(", ");
            for id in chunk {
                ids.push_bind(id.to_string());
            }
            ids.push_unseparated(")");

            let rows: Vec<RunRow> = builder.build_query_as().fetch_all(&mut *tx).await?;
            for row in rows {
                records.push(row_to_record(row)?);
            }
        }

        tx.commit().await?;
        tracing::debug!(records = records.len(), "history rows fetched");
        Ok(records)
    }
}

#[async_trait]
impl SolverCatalog for SqliteRunHistory {
    async fn resolve(&self, name: &str) -> DomainResult<Option<Solver>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT name FROM solvers WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(name,)| Solver::new(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{all_embedded_migrations, open_in_memory_pool, Migrator};

    async fn setup_test_repo() -> SqliteRunHistory {
        let pool = open_in_memory_pool().await.unwrap();
        let migrator = Migrator::new(pool.clone());
        migrator.run_embedded_migrations(all_embedded_migrations()).await.unwrap();
        SqliteRunHistory::new(pool)
    }

    fn run(task_id: Uuid, solver: &str, budget_secs: u64, cost_millis: u64) -> RunRecord {
        RunRecord::new(
            task_id,
            solver,
            Duration::from_secs(budget_secs),
            Duration::from_millis(cost_millis),
        )
    }

    #[tokio::test]
    async fn test_insert_and_query_round_trip() {
        let repo = setup_test_repo().await;
        let task_id = Uuid::new_v4();
        let started = chrono::Utc::now();

        let record = run(task_id, "minisat", 10, 4321)
            .recyclable()
            .with_answer(Answer::satisfiable(vec![1, -2, 3]))
            .with_seed(42)
            .with_started_at(started);
        repo.insert_run(&record).await.unwrap();

        let tasks = [task_id];
        let found = repo
            .query(&HistoryQuery::recyclable("minisat", Duration::ZERO, &tasks))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        let got = &found[0];
        assert_eq!(got.id, record.id);
        assert_eq!(got.cost, Duration::from_millis(4321));
        assert_eq!(got.answer, record.answer);
        assert_eq!(got.seed, Some(42));
        assert_eq!(
            got.started_at.map(|t| t.timestamp_micros()),
            Some(started.timestamp_micros())
        );
    }

    #[tokio::test]
    async fn test_query_filters_solver_budget_and_recyclable() {
        let repo = setup_test_repo().await;
        let task_id = Uuid::new_v4();

        repo.insert_runs(&[
            run(task_id, "minisat", 10, 1000).recyclable(),
            run(task_id, "minisat", 4, 1000).recyclable(),
            run(task_id, "minisat", 10, 1000),
            run(task_id, "glucose", 10, 1000).recyclable(),
        ])
        .await
        .unwrap();

        let tasks = [task_id];
        let found = repo
            .query(&HistoryQuery::recyclable("minisat", Duration::from_secs(5), &tasks))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].budget, Duration::from_secs(10));

        let all = repo
            .query(&HistoryQuery {
                recyclable_only: false,
                ..HistoryQuery::recyclable("minisat", Duration::ZERO, &tasks)
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_query_budget_boundary_is_inclusive() {
        let repo = setup_test_repo().await;
        let task_id = Uuid::new_v4();
        repo.insert_run(&run(task_id, "minisat", 5, 100).recyclable()).await.unwrap();

        let tasks = [task_id];
        let found = repo
            .query(&HistoryQuery::recyclable("minisat", Duration::from_secs(5), &tasks))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_durations_keep_nanosecond_precision() {
        let repo = setup_test_repo().await;
        let task_id = Uuid::new_v4();
        let budget = Duration::from_nanos(5_000_000_400);
        let record = RunRecord::new(task_id, "minisat", budget, Duration::from_nanos(5_000_000_401))
            .recyclable()
            .with_answer(Answer::unsatisfiable());
        repo.insert_run(&record).await.unwrap();

        let tasks = [task_id];
        let found = repo
            .query(&HistoryQuery::recyclable("minisat", budget, &tasks))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].budget, budget);
        assert_eq!(found[0].cost, Duration::from_nanos(5_000_000_401));

        let above = repo
            .query(&HistoryQuery::recyclable("minisat", budget + Duration::from_nanos(1), &tasks))
            .await
            .unwrap();
        assert!(above.is_empty());
    }

    #[tokio::test]
    async fn test_query_restricts_to_task_set() {
        let repo = setup_test_repo().await;
        let inside = Uuid::new_v4();
        let outside = Uuid::new_v4();

        repo.insert_runs(&[
            run(inside, "minisat", 10, 100).recyclable(),
            run(outside, "minisat", 10, 100).recyclable(),
        ])
        .await
        .unwrap();

        let tasks = [inside];
        let found = repo
            .query(&HistoryQuery::recyclable("minisat", Duration::ZERO, &tasks))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].task_id, inside);
    }

    #[tokio::test]
    async fn test_query_chunks_large_task_sets() {
        let repo = setup_test_repo().await;
        let task_ids: Vec<Uuid> = (0..(MAX_TASK_IDS_PER_QUERY * 2 + 7)).map(|_| Uuid::new_v4()).collect();

        let runs: Vec<RunRecord> = task_ids
            .iter()
            .map(|&id| run(id, "minisat", 10, 100).recyclable())
            .collect();
        repo.insert_runs(&runs).await.unwrap();

        let found = repo
            .query(&HistoryQuery::recyclable("minisat", Duration::ZERO, &task_ids))
            .await
            .unwrap();
        assert_eq!(found.len(), task_ids.len());
    }

    #[tokio::test]
    async fn test_query_with_no_tasks_is_empty() {
        let repo = setup_test_repo().await;
        let found = repo
            .query(&HistoryQuery::recyclable("minisat", Duration::ZERO, &[]))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_row_is_data_access_error() {
        let repo = setup_test_repo().await;
        let task_id = Uuid::new_v4();
        repo.register_solver("minisat", "sat").await.unwrap();
        repo.register_task(task_id, Some("bad.cnf"), None).await.unwrap();

        sqlx::query(
            "INSERT INTO solver_runs (id, task_id, solver_name, budget_ns, cost_ns, recyclable)
             VALUES ('not-a-uuid', ?, 'minisat', 1000000000, 10, 1)",
        )
        .bind(task_id.to_string())
        .execute(&repo.pool)
        .await
        .unwrap();

        let tasks = [task_id];
        let result = repo
            .query(&HistoryQuery::recyclable("minisat", Duration::ZERO, &tasks))
            .await;
        assert!(matches!(result, Err(DomainError::DataAccess(_))));
    }

    #[tokio::test]
    async fn test_closed_pool_is_data_access_error() {
        let repo = setup_test_repo().await;
        repo.pool.close().await;

        let tasks = [Uuid::new_v4()];
        let result = repo
            .query(&HistoryQuery::recyclable("minisat", Duration::ZERO, &tasks))
            .await;
        assert!(matches!(result, Err(DomainError::DataAccess(_))));
    }

    #[tokio::test]
    async fn test_resolve_solver() {
        let repo = setup_test_repo().await;
        repo.register_solver("kcnfs", "sat").await.unwrap();

        assert_eq!(repo.resolve("kcnfs").await.unwrap(), Some(Solver::new("kcnfs")));
        assert_eq!(repo.resolve("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_runs_is_atomic() {
        let repo = setup_test_repo().await;
        let task_id = Uuid::new_v4();
        let first = run(task_id, "minisat", 10, 100).recyclable();
        let duplicate = first.clone();

        let result = repo.insert_runs(&[first, duplicate]).await;
        assert!(result.is_err());

        let tasks = [task_id];
        let found = repo
            .query(&HistoryQuery::recyclable("minisat", Duration::ZERO, &tasks))
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
