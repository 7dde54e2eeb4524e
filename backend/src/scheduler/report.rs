//! Schedule reporter: turns solved start steps into timetable rows.

use std::fmt::Write as _;

use serde::Serialize;

use crate::models::{Horizon, TargetId, TelescopeId, TimeIndex};
use crate::scheduler::solver::SolveResult;
use crate::services::windows::AcceptedWindow;

/// One observation of the final schedule, in horizon steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduledObservation {
    pub telescope: TelescopeId,
    pub target: TargetId,
    pub start: TimeIndex,
    pub end: TimeIndex,
    pub duration: TimeIndex,
}

/// Rows for every selected assignment, ordered by telescope then target.
///
/// # Panics
///
/// When `result` names a (telescope, target) pair with no accepted window;
/// that can only happen if `result` came from a different model.
pub fn report(result: &SolveResult, accepted: &[AcceptedWindow]) -> Vec<ScheduledObservation> {
    result
        .assignments
        .iter()
        .map(|(&(telescope, target), &start)| {
            let candidate = accepted
                .iter()
                .find(|a| a.telescope == telescope && a.target == target)
                .unwrap_or_else(|| {
                    panic!("target {target} on telescope {telescope} has no accepted window")
                });
            ScheduledObservation {
                telescope,
                target,
                start,
                end: start + candidate.duration,
                duration: candidate.duration,
            }
        })
        .collect()
}

/// Serializable schedule with wall-clock times.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub status: String,
    pub objective: Option<i64>,
    pub horizon_start: chrono::DateTime<chrono::Utc>,
    pub horizon_steps: TimeIndex,
    pub observations: Vec<TimedObservation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimedObservation {
    #[serde(flatten)]
    pub observation: ScheduledObservation,
    pub start_utc: chrono::DateTime<chrono::Utc>,
    pub end_utc: chrono::DateTime<chrono::Utc>,
}

impl ScheduleReport {
    pub fn new(
        result: &SolveResult,
        observations: &[ScheduledObservation],
        horizon: &Horizon,
    ) -> Self {
        Self {
            status: result.status.to_string(),
            objective: result.objective,
            horizon_start: horizon.origin().to_datetime(),
            horizon_steps: horizon.len(),
            observations: observations
                .iter()
                .map(|&observation| TimedObservation {
                    observation,
                    start_utc: horizon.instant(observation.start).to_datetime(),
                    end_utc: horizon.instant(observation.end).to_datetime(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text timetable.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Horizon: {} steps from {}",
            self.horizon_steps,
            self.horizon_start.format("%Y-%m-%d %H:%M UTC")
        );
        if self.observations.is_empty() {
            let _ = writeln!(out, "No observations scheduled ({})", self.status);
            return out;
        }

        let _ = writeln!(
            out,
            "{:>9} {:>8} {:>6} {:>6} {:>5}  {:<5}  {:<5}",
            "telescope", "target", "start", "end", "dur", "from", "to"
        );
        for row in &self.observations {
            let o = &row.observation;
            let _ = writeln!(
                out,
                "{:>9} {:>8} {:>6} {:>6} {:>5}  {}  {}",
                o.telescope,
                o.target,
                o.start,
                o.end,
                o.duration,
                row.start_utc.format("%H:%M"),
                row.end_utc.format("%H:%M")
            );
        }
        match self.objective {
            Some(objective) => {
                let _ = writeln!(out, "Status: {} (objective {})", self.status, objective);
            }
            None => {
                let _ = writeln!(out, "Status: {}", self.status);
            }
        }
        out
    }
}
