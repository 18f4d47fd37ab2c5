//! Implementation of the `portfolio-world init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::adapters::sqlite::{initialize_database, Migrator};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, DatabaseConfig};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::setup::{create_config_dir, create_config_file, SetupPaths};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.yaml with the defaults
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub database_path: PathBuf,
    pub schema_version: i64,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push("\nWrote default configuration to .portfolio/config.yaml".to_string());
        }
        lines.push(format!(
            "\nRun history database at {} (schema version {})",
            self.database_path.display(),
            self.schema_version
        ));
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, config: Option<&Config>, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };
    let paths = SetupPaths::in_dir(&target_path);

    let created = create_config_dir(&paths)?;
    let config_written = create_config_file(&paths, args.force)?;

    // An explicit --config wins; otherwise read what now sits in the project.
    let config = match config {
        Some(config) => config.clone(),
        None => ConfigLoader::load_from_dir(&paths.config_dir)?,
    };

    let database_path = paths.resolve(&config.database.path);
    let database = DatabaseConfig {
        path: database_path.display().to_string(),
        ..config.database.clone()
    };
    let pool = initialize_database(&database)
        .await
        .context("Failed to initialize database")?;
    let schema_version = Migrator::new(pool.clone())
        .get_current_version()
        .await
        .context("Failed to read schema version")?;
    pool.close().await;

    tracing::info!(path = %target_path.display(), schema_version, "project initialized");

    let output_data = InitOutput {
        success: true,
        message: if created {
            "Project initialized successfully.".to_string()
        } else {
            "Project already initialized; database is up to date.".to_string()
        },
        initialized_path: target_path,
        config_written,
        database_path,
        schema_version,
    };

    output(&output_data, json_mode);
    Ok(())
}
