//! Historical solver run records.
//!
//! A run record is one past execution of a solver against a task. The trainer
//! only reads these; the execution service writes them.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::action::{duration_secs, Action};
use super::outcome::Outcome;

/// Answer reported by a solver. Present iff the solver decided the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Whether the solver found the formula satisfiable.
    pub satisfiable: bool,
    /// Satisfying assignment, for satisfiable answers that carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Vec<i64>>,
}

impl Answer {
    /// A satisfiable answer carrying its assignment.
    pub fn satisfiable(certificate: Vec<i64>) -> Self {
        Self {
            satisfiable: true,
            certificate: Some(certificate),
        }
    }

    /// An unsatisfiable answer. It has no certificate.
    pub fn unsatisfiable() -> Self {
        Self {
            satisfiable: false,
            certificate: None,
        }
    }
}

/// One historical attempt of a solver on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: Uuid,
    /// Task the solver was run on.
    pub task_id: Uuid,
    /// Name of the solver that ran.
    pub solver: String,
    /// Wall-clock cutoff allocated to the run.
    #[serde(rename = "budget_secs", with = "duration_secs")]
    pub budget: Duration,
    /// Measured cost of the run.
    #[serde(rename = "cost_secs", with = "duration_secs")]
    pub cost: Duration,
    /// Safe to reuse across experiments (no trial-specific entanglement).
    #[serde(default)]
    pub recyclable: bool,
    /// `None` when the run was cut off or crashed.
    #[serde(default)]
    pub answer: Option<Answer>,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    /// Create a record with a fresh id and no answer.
    pub fn new(task_id: Uuid, solver: impl Into<String>, budget: Duration, cost: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            solver: solver.into(),
            budget,
            cost,
            recyclable: false,
            answer: None,
            seed: None,
            started_at: None,
        }
    }

    /// Mark the run as reusable training evidence.
    pub fn recyclable(mut self) -> Self {
        self.recyclable = true;
        self
    }

    pub fn with_answer(mut self, answer: Answer) -> Self {
        self.answer = Some(answer);
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// Whether this record is valid evidence for `action`.
    ///
    /// It must come from the action's solver, be recyclable, and have been
    /// allocated at least the action's budget.
    pub fn is_eligible_for(&self, action: &Action) -> bool {
        self.recyclable && self.solver == action.solver().name() && self.budget >= action.budget()
    }

    /// Outcome this record evidences for `action`.
    ///
    /// Censored: a run that answered only after the action's budget elapsed is
    /// `Unsolved` for that action.
    pub fn outcome_for(&self, action: &Action) -> Outcome {
        if self.cost <= action.budget() {
            Outcome::from_answer(self.answer.as_ref())
        } else {
            Outcome::Unsolved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Solver;

    fn action(budget_secs: u64) -> Action {
        Action::new(Solver::new("walksat"), Duration::from_secs(budget_secs))
    }

    fn answered(budget_secs: u64, cost_millis: u64) -> RunRecord {
        RunRecord::new(
            Uuid::new_v4(),
            "walksat",
            Duration::from_secs(budget_secs),
            Duration::from_millis(cost_millis),
        )
        .recyclable()
        .with_answer(Answer::unsatisfiable())
    }

    #[test]
    fn test_eligibility_requires_recyclable() {
        let mut record = answered(10, 1000);
        assert!(record.is_eligible_for(&action(5)));
        record.recyclable = false;
        assert!(!record.is_eligible_for(&action(5)));
    }

    #[test]
    fn test_eligibility_budget_boundary() {
        let record = answered(10, 1000);
        assert!(record.is_eligible_for(&action(10)));
        assert!(!record.is_eligible_for(&action(11)));

        let just_short = RunRecord {
            budget: Duration::from_secs(10) - Duration::from_nanos(1),
            ..record
        };
        assert!(!just_short.is_eligible_for(&action(10)));
    }

    #[test]
    fn test_eligibility_requires_matching_solver() {
        let record = answered(10, 1000);
        let other = Action::new(Solver::new("gsat"), Duration::from_secs(5));
        assert!(!record.is_eligible_for(&other));
    }

    #[test]
    fn test_outcome_censoring() {
        let record = answered(20, 12_000);
        assert_eq!(record.outcome_for(&action(5)), Outcome::Unsolved);
        assert_eq!(record.outcome_for(&action(15)), Outcome::Solved);
    }

    #[test]
    fn test_outcome_closed_upper_bound() {
        let record = answered(10, 5000);
        assert_eq!(record.outcome_for(&action(5)), Outcome::Solved);
    }

    #[test]
    fn test_outcome_without_answer_is_unsolved() {
        let record = RunRecord::new(
            Uuid::new_v4(),
            "walksat",
            Duration::from_secs(10),
            Duration::from_secs(10),
        )
        .recyclable();
        assert_eq!(record.outcome_for(&action(10)), Outcome::Unsolved);
    }

    #[test]
    fn test_record_json_shape() {
        let task_id = Uuid::new_v4();
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "task_id": task_id,
            "solver": "walksat",
            "budget_secs": 10.0,
            "cost_secs": 4.25,
            "recyclable": true,
            "answer": {"satisfiable": true, "certificate": [1, -2]}
        });

        let record: RunRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.task_id, task_id);
        assert_eq!(record.cost, Duration::from_millis(4250));
        assert!(record.recyclable);
        assert_eq!(record.answer, Some(Answer::satisfiable(vec![1, -2])));
        assert_eq!(record.seed, None);
    }
}
