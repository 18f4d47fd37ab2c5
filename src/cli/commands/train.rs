//! Implementation of the `portfolio-world train` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use uuid::Uuid;

use crate::cli::output::{output, CommandOutput};
use crate::cli::{open_reporting_history, read_request};
use crate::domain::models::Config;
use crate::services::{Trainer, TrainingSet};

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Action request file (YAML or JSON) with `solvers` and `budgets`
    pub request: PathBuf,

    /// JSON array of training task ids
    pub tasks: PathBuf,

    /// Also write the training set as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// History queries kept in flight (defaults to training.max_concurrent_queries)
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct TrainOutput {
    pub training: TrainingSet,
}

impl CommandOutput for TrainOutput {
    fn to_human(&self) -> String {
        if self.training.samples.is_empty() {
            return "No actions to harvest.".to_string();
        }

        format!(
            "Success rates over {} training task(s):\n\n{}",
            self.training.task_ids.len(),
            self.training.success_table()
        )
    }
}

pub async fn execute(args: TrainArgs, config: &Config, json_mode: bool) -> Result<()> {
    let request = read_request(&args.request)?;
    let content = tokio::fs::read_to_string(&args.tasks)
        .await
        .with_context(|| format!("Failed to read {}", args.tasks.display()))?;
    let task_ids: Vec<Uuid> = serde_json::from_str(&content)
        .with_context(|| format!("Expected a JSON array of task ids in {}", args.tasks.display()))?;

    let history = open_reporting_history(config).await?;
    let mut trainer = Trainer::new(history.clone(), history, task_ids);
    trainer.build_actions(&request).await?;

    let concurrency = args
        .concurrency
        .unwrap_or(config.training.max_concurrent_queries);
    let training = trainer.harvest(concurrency).await?;

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&training)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "training set written");
    }

    output(&TrainOutput { training }, json_mode);
    Ok(())
}
