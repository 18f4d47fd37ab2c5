//! The world a planner reasons about: an ordered, finite action space and the
//! closed outcome enumeration.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::outcome::Outcome;

/// Configuration request naming the solvers and budgets of a world.
///
/// Budgets are given in seconds. Action order follows declaration order,
/// solver-major and budget-minor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub solvers: Vec<String>,
    pub budgets: Vec<f64>,
}

impl ActionRequest {
    /// Build a request from solver names and budgets in seconds.
    pub fn new<S: Into<String>>(solvers: impl IntoIterator<Item = S>, budgets: impl IntoIterator<Item = f64>) -> Self {
        Self {
            solvers: solvers.into_iter().map(Into::into).collect(),
            budgets: budgets.into_iter().collect(),
        }
    }

    /// Number of actions this request expands to.
    pub fn action_count(&self) -> usize {
        self.solvers.len() * self.budgets.len()
    }
}

/// A fully materialized action space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct World {
    actions: Vec<Action>,
}

impl World {
    /// Wrap an already ordered action list. Callers keep actions unique.
    pub const fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Every action, in the world's fixed order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The outcome space shared by every action.
    pub const fn outcomes(&self) -> &'static [Outcome] {
        &Outcome::ALL
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Position of `action` in the world's fixed ordering.
    pub fn index_of(&self, action: &Action) -> Option<usize> {
        self.actions.iter().position(|a| a == action)
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.index_of(action).is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::models::Solver;

    #[test]
    fn test_request_from_yaml() {
        let yaml = r"
solvers:
  - foo
  - bar
  - baz
budgets: [1, 2.5]
";
        let request: ActionRequest = serde_yaml::from_str(yaml).expect("YAML should parse");
        assert_eq!(request.solvers, vec!["foo", "bar", "baz"]);
        assert_eq!(request.budgets, vec![1.0, 2.5]);
        assert_eq!(request.action_count(), 6);
    }

    #[test]
    fn test_world_index_of() {
        let a = Action::new(Solver::new("a"), Duration::from_secs(1));
        let b = Action::new(Solver::new("b"), Duration::from_secs(1));
        let world = World::new(vec![a.clone(), b.clone()]);

        assert_eq!(world.len(), 2);
        assert_eq!(world.index_of(&a), Some(0));
        assert_eq!(world.index_of(&b), Some(1));
        assert!(!world.contains(&Action::new(Solver::new("a"), Duration::from_secs(2))));
        assert_eq!(world.outcomes().len(), 2);
    }
}
