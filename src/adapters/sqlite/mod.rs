//! SQLite run history adapter.

pub mod connection;
pub mod migrations;
pub mod run_history_repository;

pub use connection::{open_in_memory_pool, open_pool, AccessMode, ConnectionError};
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use run_history_repository::SqliteRunHistory;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::DatabaseConfig;

/// Parse a UUID string from a SQLite row field.
pub fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::DataAccess(format!("invalid uuid {s:?}: {e}")))
}

/// Parse an optional RFC3339 datetime string from a SQLite row field.
pub fn parse_optional_datetime(s: Option<String>) -> DomainResult<Option<DateTime<Utc>>> {
    s.map(|s| DateTime::parse_from_rfc3339(&s).map(|d| d.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| DomainError::DataAccess(format!("invalid timestamp: {e}")))
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Schema version {found} is older than {expected}; run `portfolio-world init`")]
    SchemaOutdated { found: i64, expected: i64 },
}

/// Open (creating if needed) and migrate the run history database.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = open_pool(config, AccessMode::ReadWrite).await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

/// Open an existing, fully migrated run history for reporting queries.
pub async fn open_reporting_database(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = open_pool(config, AccessMode::Reporting).await?;
    let found = Migrator::new(pool.clone()).get_current_version().await?;
    let expected = latest_schema_version();
    if found < expected {
        pool.close().await;
        return Err(DatabaseError::SchemaOutdated { found, expected });
    }
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = open_in_memory_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}

fn latest_schema_version() -> i64 {
    all_embedded_migrations().iter().map(|m| m.version).max().unwrap_or(0)
}
