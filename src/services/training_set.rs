//! Harvested training data: every action's per-task outcome counts.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Action, OutcomeCounts};

/// Outcome counts for one action, one entry per training task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSamples {
    pub action: Action,
    pub counts: Vec<OutcomeCounts>,
}

impl ActionSamples {
    /// Counts pooled over every training task.
    pub fn pooled(&self) -> OutcomeCounts {
        self.counts.iter().copied().fold(OutcomeCounts::default(), |acc, c| acc + c)
    }
}

/// The complete harvest handed to a model builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSet {
    /// Training tasks, in the order every `counts` row follows.
    pub task_ids: Vec<Uuid>,
    pub samples: Vec<ActionSamples>,
}

impl TrainingSet {
    /// Assemble a training set, checking every action row covers every task.
    pub fn new(task_ids: Vec<Uuid>, samples: Vec<ActionSamples>) -> DomainResult<Self> {
        if let Some(bad) = samples.iter().find(|s| s.counts.len() != task_ids.len()) {
            return Err(DomainError::DataAccess(format!(
                "{} has {} task entries, expected {}",
                bad.action,
                bad.counts.len(),
                task_ids.len()
            )));
        }

        Ok(Self { task_ids, samples })
    }

    /// Per-task counts for `action`, in task order. `None` if the action was
    /// not harvested.
    pub fn get(&self, action: &Action) -> Option<&[OutcomeCounts]> {
        self.samples
            .iter()
            .find(|s| &s.action == action)
            .map(|s| s.counts.as_slice())
    }

    /// Table of pooled success rates, one row per solver and one column per
    /// budget, in world order. Cells without evidence read `-`.
    pub fn success_table(&self) -> Table {
        let mut solvers: Vec<&str> = Vec::new();
        let mut budgets: Vec<std::time::Duration> = Vec::new();
        for sample in &self.samples {
            let name = sample.action.solver().name();
            if !solvers.contains(&name) {
                solvers.push(name);
            }
            if !budgets.contains(&sample.action.budget()) {
                budgets.push(sample.action.budget());
            }
        }

        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(
                std::iter::once(Cell::new("SOLVER")).chain(
                    budgets
                        .iter()
                        .map(|b| Cell::new(format!("{}s", b.as_secs_f64())).set_alignment(CellAlignment::Right)),
                ),
            );

        for solver in solvers {
            let mut row = vec![Cell::new(solver)];
            for budget in &budgets {
                let rate = self
                    .samples
                    .iter()
                    .find(|s| s.action.solver().name() == solver && s.action.budget() == *budget)
                    .and_then(|s| s.pooled().success_rate());
                let text = rate.map_or_else(|| "-".to_string(), |r| format!("{r:.4}"));
                row.push(Cell::new(text).set_alignment(CellAlignment::Right));
            }
            table.add_row(row);
        }

        table
    }
}
