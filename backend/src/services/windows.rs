//! Window finder: scans the horizon for the runs of minutes during which a
//! telescope can observe a target.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Horizon, Target, TargetId, Telescope, TelescopeId, TimeIndex, Window};
use crate::services::ephemeris::Ephemeris;
use crate::services::visibility::is_visible;

/// Which visible runs of a pair become candidate assignments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Only the first visible run, and only if it is long enough.
    #[default]
    FirstOnly,
    /// Every visible run long enough for the observation.
    AllRuns,
}

/// Why a (telescope, target) pair yields no window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The target is never observable within the horizon.
    NeverVisible,
    /// Visible runs exist, but the longest considered one is too short.
    TooShort { longest: TimeIndex, required: TimeIndex },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NeverVisible => write!(f, "never visible"),
            Rejection::TooShort { longest, required } => {
                write!(f, "visible for {longest} min, needs {required} min")
            }
        }
    }
}

/// A window accepted for one (telescope, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptedWindow {
    pub telescope: TelescopeId,
    pub target: TargetId,
    /// Position of the run among the pair's accepted runs (0 for the first).
    pub run: usize,
    pub window: Window,
    pub duration: TimeIndex,
    /// Priority of the target; breaks ties between otherwise equal schedules.
    #[serde(default)]
    pub priority: f64,
}

/// First maximal visible run starting at or after `from`.
fn next_run<E: Ephemeris + ?Sized>(
    telescope: &Telescope,
    target: &Target,
    horizon: &Horizon,
    ephemeris: &E,
    from: TimeIndex,
) -> Option<Window> {
    let visible = |i: TimeIndex| is_visible(telescope, target, horizon.instant(i), ephemeris);

    let start = (from..horizon.len()).find(|&i| visible(i))?;
    let end = (start + 1..horizon.len())
        .find(|&i| !visible(i))
        .unwrap_or(horizon.len());
    Some(Window::new(start, end))
}

/// The first visible run of the pair, if it holds `target.duration` minutes.
///
/// Later runs are not considered even when the first one is too short.
pub fn find_window<E: Ephemeris + ?Sized>(
    telescope: &Telescope,
    target: &Target,
    horizon: &Horizon,
    ephemeris: &E,
) -> Option<Window> {
    next_run(telescope, target, horizon, ephemeris, 0).filter(|w| w.fits(target.duration))
}

/// Every visible run of the pair that holds `target.duration` minutes, in
/// time order.
pub fn find_windows<E: Ephemeris + ?Sized>(
    telescope: &Telescope,
    target: &Target,
    horizon: &Horizon,
    ephemeris: &E,
) -> Vec<Window> {
    visible_runs(telescope, target, horizon, ephemeris)
        .into_iter()
        .filter(|w| w.fits(target.duration))
        .collect()
}

fn visible_runs<E: Ephemeris + ?Sized>(
    telescope: &Telescope,
    target: &Target,
    horizon: &Horizon,
    ephemeris: &E,
) -> Vec<Window> {
    let mut runs = Vec::new();
    let mut from = 0;
    while let Some(run) = next_run(telescope, target, horizon, ephemeris, from) {
        // A run always ends on a non-visible step or on the horizon end.
        from = run.end + 1;
        runs.push(run);
    }
    runs
}

/// Windows of one pair under `policy`, or the reason there are none.
pub fn classify_pair<E: Ephemeris + ?Sized>(
    telescope: &Telescope,
    target: &Target,
    horizon: &Horizon,
    ephemeris: &E,
    policy: WindowPolicy,
) -> Result<Vec<Window>, Rejection> {
    let considered = match policy {
        WindowPolicy::FirstOnly => next_run(telescope, target, horizon, ephemeris, 0)
            .into_iter()
            .collect(),
        WindowPolicy::AllRuns => visible_runs(telescope, target, horizon, ephemeris),
    };

    let longest = match considered.iter().map(Window::len).max() {
        Some(longest) => longest,
        None => return Err(Rejection::NeverVisible),
    };

    let accepted: Vec<Window> = considered
        .into_iter()
        .filter(|w| w.fits(target.duration))
        .collect();
    if accepted.is_empty() {
        return Err(Rejection::TooShort {
            longest,
            required: target.duration,
        });
    }
    Ok(accepted)
}

/// Evaluate every (telescope, target) pair and collect the accepted windows.
///
/// Pairs are evaluated on the rayon pool; the result is ordered by telescope,
/// then target, then run, following the input order. Rejected pairs are
/// logged at debug level.
pub fn discover_windows<E: Ephemeris + ?Sized>(
    telescopes: &[Telescope],
    targets: &[Target],
    horizon: &Horizon,
    ephemeris: &E,
    policy: WindowPolicy,
) -> Vec<AcceptedWindow> {
    let pairs: Vec<(&Telescope, &Target)> = telescopes
        .iter()
        .flat_map(|scope| targets.iter().map(move |target| (scope, target)))
        .collect();

    let outcomes: Vec<Result<Vec<Window>, Rejection>> = pairs
        .par_iter()
        .map(|(scope, target)| classify_pair(scope, target, horizon, ephemeris, policy))
        .collect();

    let mut accepted = Vec::new();
    let mut rejected = 0usize;
    for ((scope, target), outcome) in pairs.iter().zip(outcomes) {
        match outcome {
            Ok(windows) => {
                accepted.extend(windows.into_iter().enumerate().map(|(run, window)| {
                    AcceptedWindow {
                        telescope: scope.id,
                        target: target.id,
                        run,
                        window,
                        duration: target.duration,
                        priority: target.priority,
                    }
                }));
            }
            Err(reason) => {
                rejected += 1;
                debug!(
                    "Discarding target {} on telescope {}: {}",
                    target.id, scope.id, reason
                );
            }
        }
    }

    info!(
        "Window discovery: {} pairs, {} windows accepted, {} pairs rejected",
        pairs.len(),
        accepted.len(),
        rejected
    );
    accepted
}
