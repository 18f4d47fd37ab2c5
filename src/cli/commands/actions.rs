//! Implementation of the `portfolio-world actions` command.

use anyhow::Result;
use clap::Args;
use comfy_table::{presets, Cell, CellAlignment, Table};
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::cli::{open_reporting_history, read_request};
use crate::domain::models::{Action, Config};
use crate::services::Trainer;

#[derive(Args, Debug)]
pub struct ActionsArgs {
    /// Action request file (YAML or JSON) with `solvers` and `budgets`
    pub request: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct ActionOutput {
    pub index: usize,
    pub solver: String,
    pub budget_secs: f64,
    pub description: String,
}

impl From<(usize, &Action)> for ActionOutput {
    fn from((index, action): (usize, &Action)) -> Self {
        Self {
            index,
            solver: action.solver().name().to_string(),
            budget_secs: action.cost(),
            description: action.description(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ActionListOutput {
    pub actions: Vec<ActionOutput>,
    pub total: usize,
}

impl CommandOutput for ActionListOutput {
    fn to_human(&self) -> String {
        if self.actions.is_empty() {
            return "No actions: the request names no solvers or no budgets.".to_string();
        }

        let mut table = Table::new();
        table.load_preset(presets::NOTHING).set_header(vec!["#", "SOLVER", "BUDGET", "ACTION"]);
        for action in &self.actions {
            table.add_row(vec![
                Cell::new(action.index).set_alignment(CellAlignment::Right),
                Cell::new(&action.solver),
                Cell::new(format!("{}s", action.budget_secs)).set_alignment(CellAlignment::Right),
                Cell::new(&action.description),
            ]);
        }

        format!("{} action(s):\n\n{table}", self.total)
    }
}

pub async fn execute(args: ActionsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let request = read_request(&args.request)?;
    let history = open_reporting_history(config).await?;

    let mut trainer = Trainer::new(history.clone(), history, Vec::new());
    let actions: Vec<ActionOutput> = trainer
        .build_actions(&request)
        .await?
        .iter()
        .enumerate()
        .map(ActionOutput::from)
        .collect();

    let output_data = ActionListOutput {
        total: actions.len(),
        actions,
    };

    output(&output_data, json_mode);
    Ok(())
}
