//! Discrete planning horizon and the windows cut out of it.

use serde::{Deserialize, Serialize};

use crate::models::ModifiedJulianDate;

/// Position on the horizon, in minutes from its origin.
pub type TimeIndex = i64;

/// Horizon length used when no twilight bounds are available (12 h).
pub const MAX_STEPS: TimeIndex = 720;

/// Slack absorbing MJD rounding before truncating to whole minutes.
const MINUTE_EPSILON: f64 = 1e-6;

/// A run of one-minute steps starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Horizon {
    origin: ModifiedJulianDate,
    len: TimeIndex,
}

impl Horizon {
    /// A horizon of `len` steps; a negative length is clamped to zero.
    pub fn new(origin: ModifiedJulianDate, len: TimeIndex) -> Self {
        Self {
            origin,
            len: len.max(0),
        }
    }

    /// `MAX_STEPS` minutes from `reference`.
    pub fn fixed(reference: ModifiedJulianDate) -> Self {
        Self::new(reference, MAX_STEPS)
    }

    /// Horizon covering `[start, stop)`, truncated to whole minutes.
    pub fn between(start: ModifiedJulianDate, stop: ModifiedJulianDate) -> Self {
        Self::new(start, (start.minutes_until(stop) + MINUTE_EPSILON).trunc() as TimeIndex)
    }

    pub fn origin(&self) -> ModifiedJulianDate {
        self.origin
    }

    pub fn len(&self) -> TimeIndex {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Instant of step `index`.
    pub fn instant(&self, index: TimeIndex) -> ModifiedJulianDate {
        self.origin.add_minutes(index as f64)
    }

    /// Whether `window` lies inside `[0, len]`.
    pub fn contains(&self, window: &Window) -> bool {
        window.start >= 0 && window.end <= self.len
    }
}

/// Half-open run `[start, end)` of horizon steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Window {
    pub start: TimeIndex,
    pub end: TimeIndex,
}

impl Window {
    pub fn new(start: TimeIndex, end: TimeIndex) -> Self {
        debug_assert!(start <= end, "window [{start}, {end}) is inverted");
        Self { start, end }
    }

    pub fn len(&self) -> TimeIndex {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether an observation of `duration` steps fits.
    pub fn fits(&self, duration: TimeIndex) -> bool {
        self.len() >= duration
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
