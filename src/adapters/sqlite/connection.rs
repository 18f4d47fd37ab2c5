//! Connection pools for the run history database.
//!
//! `init` and `import` write the history. `actions` and `train` only report
//! from it, so they get a pool that refuses writes and never creates a
//! database file.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::domain::models::DatabaseConfig;

const BUSY_TIMEOUT: Duration = Duration::from_secs(30);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Invalid database path: {0}")]
    InvalidPath(String),
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to open run history {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: sqlx::Error,
    },
}

/// How a pool may touch the run history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Create the database if missing and allow writes.
    ReadWrite,
    /// Open an existing database with `query_only` set on every connection.
    Reporting,
}

/// Connection options for the configured database. Writers create the file
/// and put it in WAL mode; readers leave the journal mode alone.
fn connect_options(config: &DatabaseConfig, mode: AccessMode) -> Result<SqliteConnectOptions, ConnectionError> {
    let options = SqliteConnectOptions::from_str(&config.url())
        .map_err(|_| ConnectionError::InvalidPath(config.path.clone()))?
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    Ok(match mode {
        AccessMode::ReadWrite => options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal),
        AccessMode::Reporting => options.create_if_missing(false).pragma("query_only", "ON"),
    })
}

/// Open a pool over the configured database, sized by `max_connections`.
pub async fn open_pool(config: &DatabaseConfig, mode: AccessMode) -> Result<SqlitePool, ConnectionError> {
    if mode == AccessMode::ReadWrite {
        if let Some(file) = database_file(config) {
            ensure_parent_directory(&file)?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(connect_options(config, mode)?)
        .await
        .map_err(|source| ConnectionError::OpenFailed {
            path: config.path.clone(),
            source,
        })?;

    tracing::debug!(
        path = %config.path,
        ?mode,
        max_connections = config.max_connections,
        "run history pool opened"
    );
    Ok(pool)
}

/// In-memory pool for tests. A single connection keeps the database alive.
pub async fn open_in_memory_pool() -> Result<SqlitePool, ConnectionError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|_| ConnectionError::InvalidPath(":memory:".to_string()))?
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|source| ConnectionError::OpenFailed {
            path: ":memory:".to_string(),
            source,
        })
}

/// The on-disk file behind the configured path, if any.
fn database_file(config: &DatabaseConfig) -> Option<PathBuf> {
    let path = config
        .path
        .strip_prefix("sqlite://")
        .or_else(|| config.path.strip_prefix("sqlite:"))
        .unwrap_or(&config.path);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

fn ensure_parent_directory(file: &Path) -> Result<(), ConnectionError> {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|source| ConnectionError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
