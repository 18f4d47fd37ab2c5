//! Implementation of the `portfolio-world import` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::open_history;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, RunRecord};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file holding an array of run records
    pub runs: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct ImportOutput {
    pub success: bool,
    pub imported: usize,
    pub recyclable: usize,
    pub solvers: Vec<String>,
}

impl CommandOutput for ImportOutput {
    fn to_human(&self) -> String {
        format!(
            "Imported {} run(s), {} recyclable, from solver(s): {}",
            self.imported,
            self.recyclable,
            self.solvers.join(", ")
        )
    }
}

pub async fn execute(args: ImportArgs, config: &Config, json_mode: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.runs)
        .await
        .with_context(|| format!("Failed to read {}", args.runs.display()))?;
    let runs: Vec<RunRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid run records in {}", args.runs.display()))?;

    let history = open_history(config).await?;
    let imported = history
        .insert_runs(&runs)
        .await
        .context("Failed to import run records")?;

    let mut solvers: Vec<String> = runs.iter().map(|r| r.solver.clone()).collect();
    solvers.sort();
    solvers.dedup();

    let output_data = ImportOutput {
        success: true,
        imported,
        recyclable: runs.iter().filter(|r| r.recyclable).count(),
        solvers,
    };

    output(&output_data, json_mode);
    Ok(())
}
