//! Outcome domain model.
//!
//! An action yields exactly one of two outcomes. The enumeration is closed and
//! each variant carries a constant utility.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::run::Answer;

/// The result of taking an action on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The solver produced an answer within the action's budget.
    Solved,
    /// No answer within the action's budget.
    Unsolved,
}

impl Outcome {
    /// Every outcome, in index order.
    pub const ALL: [Outcome; 2] = [Outcome::Solved, Outcome::Unsolved];

    /// Utility of this outcome. `Solved` is strictly preferred.
    pub const fn utility(self) -> f64 {
        match self {
            Self::Solved => 1.0,
            Self::Unsolved => 0.0,
        }
    }

    /// Position of this outcome in [`Outcome::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Solved => 0,
            Self::Unsolved => 1,
        }
    }

    /// Classify an attempt by its answer. Satisfiable and unsatisfiable
    /// answers both count as solved.
    pub const fn from_answer(answer: Option<&Answer>) -> Self {
        match answer {
            Some(_) => Self::Solved,
            None => Self::Unsolved,
        }
    }

    /// Stable lowercase code, as used in JSON output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solved => "solved",
            Self::Unsolved => "unsolved",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "solved" => Some(Self::Solved),
            "unsolved" => Some(Self::Unsolved),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-task outcome counts for one action: `{Solved: s, Unsolved: u}`.
///
/// `{0, 0}` means the history holds no evidence for the task. Consumers must
/// not read it as "always fails".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub solved: u64,
    pub unsolved: u64,
}

impl OutcomeCounts {
    /// Counts from explicit tallies.
    pub const fn new(solved: u64, unsolved: u64) -> Self {
        Self { solved, unsolved }
    }

    /// Count for a single outcome.
    pub const fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Solved => self.solved,
            Outcome::Unsolved => self.unsolved,
        }
    }

    /// Record one observation.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Solved => self.solved += 1,
            Outcome::Unsolved => self.unsolved += 1,
        }
    }

    /// Number of eligible observations behind these counts.
    pub const fn total(&self) -> u64 {
        self.solved + self.unsolved
    }

    pub const fn has_evidence(&self) -> bool {
        self.total() > 0
    }

    /// Empirical probability of `Solved`, or `None` without evidence.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> Option<f64> {
        self.has_evidence()
            .then(|| self.solved as f64 / self.total() as f64)
    }

    /// `(outcome, count)` pairs in outcome index order.
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, u64)> + '_ {
        Outcome::ALL.into_iter().map(|o| (o, self.get(o)))
    }
}

impl std::ops::Add for OutcomeCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.solved + rhs.solved, self.unsolved + rhs.unsolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilities_are_ordered() {
        assert!(Outcome::Solved.utility() > Outcome::Unsolved.utility());
        assert!((Outcome::Solved.utility() - 1.0).abs() < f64::EPSILON);
        assert!(Outcome::Unsolved.utility().abs() < f64::EPSILON);
    }

    #[test]
    fn test_index_matches_all() {
        for (i, outcome) in Outcome::ALL.iter().enumerate() {
            assert_eq!(outcome.index(), i);
        }
    }

    #[test]
    fn test_from_answer() {
        let sat = Answer::satisfiable(vec![1, -2, 3]);
        let unsat = Answer::unsatisfiable();
        assert_eq!(Outcome::from_answer(Some(&sat)), Outcome::Solved);
        assert_eq!(Outcome::from_answer(Some(&unsat)), Outcome::Solved);
        assert_eq!(Outcome::from_answer(None), Outcome::Unsolved);
    }

    #[test]
    fn test_string_codes() {
        for outcome in Outcome::ALL {
            assert_eq!(Outcome::from_str(outcome.as_str()), Some(outcome));
        }
        assert_eq!(Outcome::from_str("SOLVED"), Some(Outcome::Solved));
        assert_eq!(Outcome::from_str("timeout"), None);
    }

    #[test]
    fn test_counts_without_evidence() {
        let counts = OutcomeCounts::default();
        assert!(!counts.has_evidence());
        assert_eq!(counts.success_rate(), None);
    }

    #[test]
    fn test_counts_record_and_rate() {
        let mut counts = OutcomeCounts::default();
        counts.record(Outcome::Solved);
        counts.record(Outcome::Unsolved);
        counts.record(Outcome::Solved);
        counts.record(Outcome::Solved);

        assert_eq!(counts, OutcomeCounts::new(3, 1));
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.success_rate(), Some(0.75));
        assert_eq!(
            counts.iter().collect::<Vec<_>>(),
            vec![(Outcome::Solved, 3), (Outcome::Unsolved, 1)]
        );
    }

    #[test]
    fn test_counts_serialize_as_outcome_map() {
        let json = serde_json::to_value(OutcomeCounts::new(2, 5)).unwrap();
        assert_eq!(json, serde_json::json!({"solved": 2, "unsolved": 5}));
    }
}
