//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use portfolio_world::adapters::sqlite::{create_migrated_test_pool, SqliteRunHistory};
use portfolio_world::{Answer, RunRecord};
use tempfile::TempDir;
use uuid::Uuid;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Path to the CLI binary built for this test run
#[allow(dead_code)]
pub fn cli_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_portfolio-world"))
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// SQLite run history over an in-memory, migrated database
#[allow(dead_code)]
pub async fn sqlite_history() -> Arc<SqliteRunHistory> {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create migrated test pool");
    Arc::new(SqliteRunHistory::new(pool))
}

/// A recyclable run that produced an answer
#[allow(dead_code)]
pub fn answered_run(task_id: Uuid, solver: &str, budget_ms: u64, cost_ms: u64) -> RunRecord {
    RunRecord::new(
        task_id,
        solver,
        Duration::from_millis(budget_ms),
        Duration::from_millis(cost_ms),
    )
    .recyclable()
    .with_answer(Answer::satisfiable(vec![1, -2, 3]))
}

/// A recyclable run that hit its cutoff without an answer
#[allow(dead_code)]
pub fn timed_out_run(task_id: Uuid, solver: &str, budget_ms: u64) -> RunRecord {
    RunRecord::new(
        task_id,
        solver,
        Duration::from_millis(budget_ms),
        Duration::from_millis(budget_ms),
    )
    .recyclable()
}
