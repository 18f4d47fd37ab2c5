//! Action domain model.
//!
//! An action pairs a solver with a time budget. Its cost is the nominal
//! allocation (the budget), never a measured runtime.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::outcome::Outcome;

/// Opaque handle for a solver program, identified by a stable name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solver {
    name: String,
}

impl Solver {
    /// Solver handle for a catalog name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One element of the decision space: run `solver` for at most `budget`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    solver: Solver,
    #[serde(rename = "budget_secs", with = "duration_secs")]
    budget: Duration,
}

impl Action {
    pub const fn new(solver: Solver, budget: Duration) -> Self {
        Self { solver, budget }
    }

    pub const fn solver(&self) -> &Solver {
        &self.solver
    }

    /// The time-valued cost of taking this action.
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// The nominal cost of this action, in seconds.
    pub fn cost(&self) -> f64 {
        self.budget.as_secs_f64()
    }

    /// Label of the form `{solver}_{millis}ms`.
    pub fn description(&self) -> String {
        format!("{}_{}ms", self.solver.name(), self.budget.as_millis())
    }

    /// Possible outcomes of this action, in index order.
    pub const fn outcomes(&self) -> &'static [Outcome] {
        &Outcome::ALL
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

/// Convert a budget given in seconds, rejecting negative and non-finite values.
pub fn budget_from_secs(secs: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid budget {secs}s: {e}"))
}

/// Serialize a `Duration` as fractional seconds.
pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        super::budget_from_secs(secs).map_err(serde::de::Error::custom)
    }
}
