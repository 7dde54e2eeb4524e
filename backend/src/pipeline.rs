//! End-to-end planning of one night: windows, model, solution, timetable.

use interval_cp::{SolverParams, SolvingEngine};
use log::info;
use serde::{Deserialize, Serialize};

use crate::models::{Horizon, ModifiedJulianDate, Target, Telescope, TimeIndex, MAX_STEPS};
use crate::scheduler::{
    build_model_with_scope, report, solve, ExclusivityScope, ModelError, ScheduledObservation,
    SolveError, SolveResult,
};
use crate::services::{
    discover_windows, planning_horizon, AcceptedWindow, Ephemeris, HorizonMode, WindowPolicy,
};

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("no telescope to plan for")]
    NoTelescopes,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Knobs of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOptions {
    pub horizon: HorizonMode,
    /// Length of a fixed horizon, also used when no night is found.
    pub max_steps: TimeIndex,
    pub windows: WindowPolicy,
    pub exclusivity: ExclusivityScope,
    pub solver: SolverParams,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            horizon: HorizonMode::default(),
            max_steps: MAX_STEPS,
            windows: WindowPolicy::default(),
            exclusivity: ExclusivityScope::default(),
            solver: SolverParams::default(),
        }
    }
}

/// Everything a planning run produced.
#[derive(Debug, Clone)]
pub struct NightPlan {
    pub horizon: Horizon,
    pub accepted: Vec<AcceptedWindow>,
    pub result: SolveResult,
    pub observations: Vec<ScheduledObservation>,
}

/// Plan the night following `reference`.
///
/// The horizon is laid out from the first telescope's site.
pub fn plan_night<E, S>(
    telescopes: &[Telescope],
    targets: &[Target],
    reference: ModifiedJulianDate,
    ephemeris: &E,
    engine: &S,
    options: &PlanOptions,
) -> Result<NightPlan, PlanError>
where
    E: Ephemeris + ?Sized,
    S: SolvingEngine + ?Sized,
{
    let site = telescopes.first().ok_or(PlanError::NoTelescopes)?.location;
    let horizon = planning_horizon(options.horizon, reference, &site, ephemeris, options.max_steps);
    plan_horizon(telescopes, targets, horizon, ephemeris, engine, options)
}

/// Plan over an explicit horizon.
///
/// Targets are searched for windows in decreasing priority, and priority
/// breaks ties between schedules with the same count and makespans.
pub fn plan_horizon<E, S>(
    telescopes: &[Telescope],
    targets: &[Target],
    horizon: Horizon,
    ephemeris: &E,
    engine: &S,
    options: &PlanOptions,
) -> Result<NightPlan, PlanError>
where
    E: Ephemeris + ?Sized,
    S: SolvingEngine + ?Sized,
{
    // Highest priority first; equal priorities keep catalog order.
    let mut ordered = targets.to_vec();
    ordered.sort_by(|a, b| b.priority.total_cmp(&a.priority));

    let accepted = discover_windows(telescopes, &ordered, &horizon, ephemeris, options.windows);
    let model = build_model_with_scope(&accepted, &horizon, options.exclusivity)?;
    let result = solve(&model, engine, &options.solver)?;
    let observations = report(&result, &accepted);

    info!(
        "Scheduled {} of {} targets ({} candidate windows), status {}",
        observations.len(),
        targets.len(),
        accepted.len(),
        result.status
    );

    Ok(NightPlan {
        horizon,
        accepted,
        result,
        observations,
    })
}
