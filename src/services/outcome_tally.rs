//! Reduce stage of statistics harvesting: eligible run records to per-task
//! outcome counts.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::models::{Action, OutcomeCounts, RunRecord};

/// Tally the outcomes `records` evidence for `action`, one entry per task in
/// `task_ids` and in that order.
///
/// Records that are not eligible for the action (other solver, not
/// recyclable, allocated less than the action's budget) are skipped even if
/// the store returned them. Tasks without eligible records get `{0, 0}`.
pub fn tally_outcomes(action: &Action, task_ids: &[Uuid], records: &[RunRecord]) -> Vec<OutcomeCounts> {
    let mut by_task: HashMap<Uuid, OutcomeCounts> = HashMap::with_capacity(task_ids.len());

    for record in records.iter().filter(|r| r.is_eligible_for(action)) {
        by_task
            .entry(record.task_id)
            .or_default()
            .record(record.outcome_for(action));
    }

    task_ids
        .iter()
        .map(|id| by_task.get(id).copied().unwrap_or_default())
        .collect()
}
