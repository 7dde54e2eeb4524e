//! Translation of accepted windows into an interval scheduling model.
//!
//! Every accepted window becomes one optional interval whose presence literal
//! says whether the observation is scheduled. Intervals of a telescope may not
//! overlap, and each telescope gets a makespan tied to its latest end.
//! The objective first maximizes the number of scheduled observations, then
//! minimizes the sum of makespans, and finally prefers higher-priority targets.

use std::collections::{BTreeMap, BTreeSet};

use interval_cp::{
    BoolVar, CpModel, CpModelBuilder, Domain, IntVar, IntervalVar, LinearExpr,
};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{Horizon, TargetId, TelescopeId, TimeIndex, Window};
use crate::services::windows::AcceptedWindow;

/// Scope of the "scheduled at most once" constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusivityScope {
    /// Each target is scheduled on at most one telescope.
    #[default]
    PerTarget,
    /// At most one observation in the whole schedule.
    Global,
}

/// Identity of a candidate assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentKey {
    pub telescope: TelescopeId,
    pub target: TargetId,
    /// Index of the visible run for targets with several windows.
    pub run: usize,
}

impl std::fmt::Display for AssignmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}_o{}_r{}", self.telescope, self.target, self.run)
    }
}

/// Model variables of one candidate assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub window: Window,
    pub duration: TimeIndex,
    pub start: IntVar,
    pub end: IntVar,
    pub interval: IntervalVar,
    pub selected: BoolVar,
    /// Position of the target's priority among the distinct priorities of the
    /// model, 0 for the lowest.
    pub priority_rank: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("window {window} of {key} is inverted")]
    InvertedWindow { key: AssignmentKey, window: Window },

    #[error("window {window} of {key} is shorter than the {duration} min observation")]
    WindowTooShort {
        key: AssignmentKey,
        window: Window,
        duration: TimeIndex,
    },

    #[error("{key} has non-positive duration {duration}")]
    InvalidDuration { key: AssignmentKey, duration: TimeIndex },

    #[error("window {window} of {key} is outside the {horizon_len} step horizon")]
    OutsideHorizon {
        key: AssignmentKey,
        window: Window,
        horizon_len: TimeIndex,
    },

    #[error("assignment {0} appears more than once")]
    DuplicateAssignment(AssignmentKey),

    #[error("model construction failed: {0}")]
    Solver(#[from] interval_cp::Error),
}

/// A built scheduling model and the bookkeeping needed to read its solution.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct SchedulingModel {
    model: CpModel,
    assignments: BTreeMap<AssignmentKey, Assignment>,
    makespans: BTreeMap<TelescopeId, IntVar>,
    horizon_len: TimeIndex,
    selection_weight: i64,
    priority_scale: i64,
}

impl SchedulingModel {
    pub fn cp_model(&self) -> &CpModel {
        &self.model
    }

    pub fn assignments(&self) -> &BTreeMap<AssignmentKey, Assignment> {
        &self.assignments
    }

    pub fn makespans(&self) -> &BTreeMap<TelescopeId, IntVar> {
        &self.makespans
    }

    pub fn horizon_len(&self) -> TimeIndex {
        self.horizon_len
    }

    /// Objective reward of one scheduled observation.
    pub fn selection_weight(&self) -> i64 {
        self.selection_weight
    }

    /// Multiplier of the makespan and selection terms. Priority ranks of the
    /// selected observations always sum below it, so they only break ties.
    pub fn priority_scale(&self) -> i64 {
        self.priority_scale
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Build the model with per-target exclusivity.
pub fn build_model(
    accepted: &[AcceptedWindow],
    horizon: &Horizon,
) -> Result<SchedulingModel, ModelError> {
    build_model_with_scope(accepted, horizon, ExclusivityScope::default())
}

pub fn build_model_with_scope(
    accepted: &[AcceptedWindow],
    horizon: &Horizon,
    scope: ExclusivityScope,
) -> Result<SchedulingModel, ModelError> {
    validate(accepted, horizon)?;

    let horizon_len = horizon.len();
    let mut builder = CpModelBuilder::new();
    let mut assignments = BTreeMap::new();
    let ranks = priority_ranks(accepted);

    for (candidate, &priority_rank) in accepted.iter().zip(&ranks) {
        let key = AssignmentKey {
            telescope: candidate.telescope,
            target: candidate.target,
            run: candidate.run,
        };
        let (window, duration) = (candidate.window, candidate.duration);

        let start = builder.new_int_var(
            Domain::new(window.start, window.end - duration)?,
            format!("start_{key}"),
        );
        let end = builder.new_int_var(
            Domain::new(window.start + duration, window.end)?,
            format!("end_{key}"),
        );
        let selected = builder.new_bool_var(format!("selected_{key}"));
        let interval =
            builder.new_optional_interval_var(start, duration, end, selected, format!("obs_{key}"))?;

        let previous = assignments.insert(
            key,
            Assignment {
                window,
                duration,
                start,
                end,
                interval,
                selected,
                priority_rank,
            },
        );
        if previous.is_some() {
            return Err(ModelError::DuplicateAssignment(key));
        }
    }

    let telescopes: BTreeSet<TelescopeId> = assignments.keys().map(|k| k.telescope).collect();
    let mut makespans = BTreeMap::new();
    for &telescope in &telescopes {
        let intervals: Vec<IntervalVar> = assignments
            .iter()
            .filter(|(key, _)| key.telescope == telescope)
            .map(|(_, a)| a.interval)
            .collect();

        builder.add_no_overlap(intervals.iter().copied())?;
        let makespan =
            builder.new_int_var(Domain::new(0, horizon_len)?, format!("makespan_t{telescope}"));
        builder.add_max_equality(makespan, intervals)?;
        makespans.insert(telescope, makespan);
    }

    match scope {
        ExclusivityScope::PerTarget => {
            let mut by_target: BTreeMap<TargetId, Vec<BoolVar>> = BTreeMap::new();
            for (key, assignment) in &assignments {
                by_target.entry(key.target).or_default().push(assignment.selected);
            }
            for literals in by_target.into_values() {
                builder.add_at_most_one(literals)?;
            }
        }
        ExclusivityScope::Global => {
            if !assignments.is_empty() {
                builder.add_at_most_one(assignments.values().map(|a| a.selected))?;
            }
        }
    }

    // One more observation always outweighs any makespan increase.
    let selection_weight = horizon_len
        .saturating_mul(telescopes.len() as i64)
        .saturating_add(1);

    // At most one observation per target is selected, so the ranks of a
    // schedule never exceed the sum of each target's best rank.
    let mut best_rank: BTreeMap<TargetId, i64> = BTreeMap::new();
    for (key, assignment) in &assignments {
        let rank = best_rank.entry(key.target).or_default();
        *rank = (*rank).max(assignment.priority_rank);
    }
    let priority_scale = best_rank.values().sum::<i64>().saturating_add(1);

    let mut objective = LinearExpr::new();
    for &makespan in makespans.values() {
        objective = objective.add_int(makespan, priority_scale);
    }
    for assignment in assignments.values() {
        let reward = priority_scale
            .saturating_mul(selection_weight)
            .saturating_add(assignment.priority_rank);
        objective = objective.add_bool(assignment.selected, -reward);
    }
    builder.minimize(objective)?;

    let model = builder.build();
    debug!(
        "Built model: {} assignments on {} telescopes ({} int vars, {} constraints, {:?} exclusivity)",
        assignments.len(),
        makespans.len(),
        model.num_int_vars(),
        model.constraints().len(),
        scope
    );

    Ok(SchedulingModel {
        model,
        assignments,
        makespans,
        horizon_len,
        selection_weight,
        priority_scale,
    })
}

/// Dense rank of every candidate's priority, 0 for the lowest value.
fn priority_ranks(accepted: &[AcceptedWindow]) -> Vec<i64> {
    let mut levels: Vec<f64> = accepted.iter().map(|a| a.priority).collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup_by(|a, b| a.total_cmp(b).is_eq());
    accepted
        .iter()
        .map(|a| levels.partition_point(|level| level.total_cmp(&a.priority).is_lt()) as i64)
        .collect()
}

fn validate(accepted: &[AcceptedWindow], horizon: &Horizon) -> Result<(), ModelError> {
    for candidate in accepted {
        let key = AssignmentKey {
            telescope: candidate.telescope,
            target: candidate.target,
            run: candidate.run,
        };
        let window = candidate.window;
        if window.start > window.end {
            return Err(ModelError::InvertedWindow { key, window });
        }
        if candidate.duration <= 0 {
            return Err(ModelError::InvalidDuration {
                key,
                duration: candidate.duration,
            });
        }
        if !window.fits(candidate.duration) {
            return Err(ModelError::WindowTooShort {
                key,
                window,
                duration: candidate.duration,
            });
        }
        if !horizon.contains(&window) {
            return Err(ModelError::OutsideHorizon {
                key,
                window,
                horizon_len: horizon.len(),
            });
        }
    }
    Ok(())
}
