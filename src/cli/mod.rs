//! Command-line interface for `portfolio-world`.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::sqlite::{initialize_database, open_reporting_database, SqliteRunHistory};
use crate::domain::models::{ActionRequest, Config};
use crate::infrastructure::config::ConfigLoader;

use commands::actions::ActionsArgs;
use commands::import::ImportArgs;
use commands::init::InitArgs;
use commands::train::TrainArgs;

#[derive(Parser, Debug)]
#[command(name = "portfolio-world")]
#[command(about = "Build solver portfolio worlds and harvest outcome statistics from run history", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .portfolio/config.yaml, .portfolio/local.yaml and PORTFOLIO_* variables)
    #[arg(short, long, global = true, env = "PORTFOLIO_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the project directory and the run history database
    Init(InitArgs),
    /// Import run records from a JSON array
    Import(ImportArgs),
    /// Print the action list a request file builds
    Actions(ActionsArgs),
    /// Harvest per-task outcome counts for every action
    Train(TrainArgs),
}

/// Load configuration from `path`, or hierarchically when unset.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Open the configured run history database for writing, migrating it if needed.
pub async fn open_history(config: &Config) -> Result<Arc<SqliteRunHistory>> {
    let pool = initialize_database(&config.database)
        .await
        .with_context(|| format!("Failed to open run history at {}", config.database.path))?;
    Ok(Arc::new(SqliteRunHistory::new(pool)))
}

/// Open the configured run history for queries only. The database must exist.
pub async fn open_reporting_history(config: &Config) -> Result<Arc<SqliteRunHistory>> {
    let pool = open_reporting_database(&config.database)
        .await
        .with_context(|| format!("Failed to open run history at {}", config.database.path))?;
    Ok(Arc::new(SqliteRunHistory::new(pool)))
}

/// Read an action request. JSON is accepted as a subset of YAML.
pub fn read_request(path: &Path) -> Result<ActionRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Invalid action request in {}", path.display()))
}

/// Report a failed command and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": chain,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
