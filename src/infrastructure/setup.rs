//! Project setup for `portfolio-world init`
//!
//! Handles project initialization:
//! - Project directory creation
//! - Default config file creation

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::config::loader::PROJECT_DIR;

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# portfolio-world configuration
# Override settings by editing this file, adding .portfolio/local.yaml,
# or setting environment variables with the PORTFOLIO_ prefix
#
# Example environment variables:
#   export PORTFOLIO_DATABASE__PATH=/data/history.db
#   export PORTFOLIO_LOGGING__LEVEL=debug
#   export PORTFOLIO_TRAINING__MAX_CONCURRENT_QUERIES=8

# Run history database
database:
  # Path to SQLite database file (relative to the project root)
  path: ".portfolio/history.db"
  # Maximum number of database connections in pool
  max_connections: 5

# Logging configuration
logging:
  # trace, debug, info, warn, error
  level: "info"
  # pretty or json
  format: "pretty"
  # Uncomment to also write JSON log files
  # log_dir: ".portfolio/logs"
  # daily, hourly, never
  rotation: "daily"

# Statistics harvesting
training:
  # Per-action history queries kept in flight
  max_concurrent_queries: 4
"#;

/// Setup paths and directories
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub root: PathBuf,
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl SetupPaths {
    /// Setup paths rooted at `root`
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let config_dir = root.join(PROJECT_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            config_dir,
            root,
        }
    }

    /// Setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::in_dir(current_dir))
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Create the project directory. Returns whether it was created.
pub fn create_config_dir(paths: &SetupPaths) -> Result<bool> {
    if paths.config_dir.exists() {
        return Ok(false);
    }

    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")?;
    Ok(true)
}

/// Write the default configuration file. Returns whether it was written.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(true)
}
