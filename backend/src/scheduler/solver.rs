//! Solver adapter: runs a [`SchedulingModel`] through a [`SolvingEngine`] and
//! reads the selected start times back.

use std::collections::BTreeMap;

use interval_cp::{
    SolverParams, SolverStatistics, SolverStatus, SolvingEngine, TerminationReason,
};
use log::{info, warn};

use crate::models::{TargetId, TelescopeId};
use crate::scheduler::model_builder::{AssignmentKey, SchedulingModel};

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("solving engine '{engine}' rejected the model: {source}")]
    Engine {
        engine: String,
        #[source]
        source: interval_cp::Error,
    },

    #[error("solution has no value for {0}")]
    MissingValue(AssignmentKey),
}

/// What the engine found.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolverStatus,
    /// Start step of every selected observation. Empty without a solution.
    pub assignments: BTreeMap<(TelescopeId, TargetId), i64>,
    pub objective: Option<i64>,
    /// Makespan of every telescope that has candidate windows.
    pub makespans: BTreeMap<TelescopeId, i64>,
    pub termination: TerminationReason,
    pub statistics: SolverStatistics,
}

impl SolveResult {
    pub fn has_solution(&self) -> bool {
        self.status.has_solution()
    }

    /// Number of scheduled observations.
    pub fn scheduled(&self) -> usize {
        self.assignments.len()
    }
}

/// Solve `model` with `engine` under the limits of `params`.
///
/// The model is not modified. Hitting a limit yields `Feasible` or `Unknown`,
/// never `Infeasible`.
pub fn solve<E: SolvingEngine + ?Sized>(
    model: &SchedulingModel,
    engine: &E,
    params: &SolverParams,
) -> Result<SolveResult, SolveError> {
    let response = engine
        .solve(model.cp_model(), params)
        .map_err(|source| SolveError::Engine {
            engine: engine.name().to_string(),
            source,
        })?;

    match &response.termination {
        TerminationReason::Aborted(reason) => warn!(
            "Solver '{}' stopped early ({}); status {}",
            engine.name(),
            reason,
            response.status
        ),
        TerminationReason::Exhausted => info!(
            "Solver '{}' finished with status {}",
            engine.name(),
            response.status
        ),
    }

    let mut assignments = BTreeMap::new();
    let mut makespans = BTreeMap::new();
    if response.status.has_solution() {
        for (key, assignment) in model.assignments() {
            let selected = response
                .bool_value(assignment.selected)
                .ok_or(SolveError::MissingValue(*key))?;
            if !selected {
                continue;
            }
            let start = response
                .value(assignment.start)
                .ok_or(SolveError::MissingValue(*key))?;
            assignments.insert((key.telescope, key.target), start);
        }
        for (&telescope, &var) in model.makespans() {
            if let Some(value) = response.value(var) {
                makespans.insert(telescope, value);
            }
        }
    }

    Ok(SolveResult {
        status: response.status,
        assignments,
        objective: response.objective_value,
        makespans,
        termination: response.termination,
        statistics: response.statistics,
    })
}
