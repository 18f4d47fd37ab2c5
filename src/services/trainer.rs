//! Trainer: builds the world's action list from a request and harvests
//! per-task outcome counts for each action from the run history.
//!
//! A trainer serves exactly one request. It starts UNBUILT; `build_actions`
//! moves it to BUILT, after which statistics can be queried. There is no way
//! back.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{budget_from_secs, Action, ActionRequest, OutcomeCounts, Solver, World};
use crate::domain::ports::{HistoryQuery, RunHistory, SolverCatalog};
use crate::services::outcome_tally::tally_outcomes;
use crate::services::training_set::{ActionSamples, TrainingSet};

#[derive(Debug)]
enum TrainerState {
    Unbuilt,
    Built(World),
}

/// Builds one world of solver/budget actions and reads censored outcome
/// counts for its actions from a run history.
///
/// Task order is fixed at construction and every `get_data` result follows it.
pub struct Trainer<C: SolverCatalog, H: RunHistory> {
    catalog: Arc<C>,
    history: Arc<H>,
    task_ids: Vec<Uuid>,
    state: TrainerState,
}

impl<C: SolverCatalog, H: RunHistory> Trainer<C, H> {
    /// Create an unbuilt trainer over a fixed, ordered training task set.
    pub fn new(catalog: Arc<C>, history: Arc<H>, task_ids: Vec<Uuid>) -> Self {
        Self {
            catalog,
            history,
            task_ids,
            state: TrainerState::Unbuilt,
        }
    }

    pub fn task_ids(&self) -> &[Uuid] {
        &self.task_ids
    }

    /// True once `build_actions` has succeeded.
    pub const fn is_built(&self) -> bool {
        matches!(self.state, TrainerState::Built(_))
    }

    /// The built world.
    pub fn world(&self) -> DomainResult<&World> {
        match &self.state {
            TrainerState::Built(world) => Ok(world),
            TrainerState::Unbuilt => Err(DomainError::NotBuilt),
        }
    }

    /// The built action list, solver-major and budget-minor.
    pub fn actions(&self) -> DomainResult<&[Action]> {
        self.world().map(World::actions)
    }

    /// Build the action list: every requested solver crossed with every
    /// requested budget, in declaration order.
    #[instrument(skip(self, request), fields(solvers = request.solvers.len(), budgets = request.budgets.len()))]
    pub async fn build_actions(&mut self, request: &ActionRequest) -> DomainResult<&[Action]> {
        if self.is_built() {
            return Err(DomainError::AlreadyBuilt);
        }

        let budgets = parse_budgets(&request.budgets)?;
        let solvers = self.resolve_solvers(&request.solvers).await?;

        if solvers.is_empty() || budgets.is_empty() {
            warn!("action request is empty; the world has no actions");
        }

        let actions: Vec<Action> = solvers
            .iter()
            .flat_map(|solver| budgets.iter().map(move |&budget| Action::new(solver.clone(), budget)))
            .collect();

        info!(actions = actions.len(), "actions built");
        self.state = TrainerState::Built(World::new(actions));
        self.actions()
    }

    async fn resolve_solvers(&self, names: &[String]) -> DomainResult<Vec<Solver>> {
        let mut seen = HashSet::with_capacity(names.len());
        let mut solvers = Vec::with_capacity(names.len());

        for name in names {
            if name.trim().is_empty() {
                return Err(DomainError::Configuration("solver name cannot be empty".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(DomainError::Configuration(format!("duplicate solver: {name}")));
            }

            match self.catalog.resolve(name).await? {
                Some(solver) => solvers.push(solver),
                None => return Err(DomainError::Configuration(format!("unknown solver: {name}"))),
            }
        }

        Ok(solvers)
    }

    /// Per-task outcome counts for `action`, one entry per training task in
    /// construction order.
    ///
    /// Only recyclable runs allocated at least the action's budget count.
    /// A run counts as solved only if it answered within the action's budget.
    #[instrument(skip(self, action), fields(action = %action))]
    pub async fn get_data(&self, action: &Action) -> DomainResult<Vec<OutcomeCounts>> {
        let world = self.world()?;
        if !world.contains(action) {
            return Err(DomainError::UnknownAction(action.description()));
        }
        if self.task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = HistoryQuery::recyclable(action.solver().name(), action.budget(), &self.task_ids);
        let records = self.history.query(&query).await?;
        let counts = tally_outcomes(action, &self.task_ids, &records);

        let solved: u64 = counts.iter().map(|c| c.solved).sum();
        let eligible: u64 = counts.iter().map(|c| c.total()).sum();
        debug!(fetched = records.len(), eligible, solved, "outcomes tallied");

        Ok(counts)
    }

    /// Harvest every action's counts, keeping up to `concurrency` history
    /// queries in flight. Samples come back in world order.
    #[instrument(skip(self))]
    pub async fn harvest(&self, concurrency: usize) -> DomainResult<TrainingSet> {
        let world = self.world()?;

        let samples: Vec<ActionSamples> = stream::iter(world.actions())
            .map(|action| async move {
                let counts = self.get_data(action).await?;
                Ok::<_, DomainError>(ActionSamples {
                    action: action.clone(),
                    counts,
                })
            })
            .buffered(concurrency.max(1))
            .try_collect()
            .await?;

        let training = TrainingSet::new(self.task_ids.clone(), samples)?;
        debug!("success rates by budget:\n{}", training.success_table());
        Ok(training)
    }
}

fn parse_budgets(secs: &[f64]) -> DomainResult<Vec<Duration>> {
    let mut seen = HashSet::with_capacity(secs.len());
    let mut budgets = Vec::with_capacity(secs.len());

    for &s in secs {
        let budget = budget_from_secs(s).map_err(DomainError::Configuration)?;
        if !seen.insert(budget) {
            return Err(DomainError::Configuration(format!("duplicate budget: {s}s")));
        }
        budgets.push(budget);
    }

    Ok(budgets)
}
