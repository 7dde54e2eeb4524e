//! Observation targets read from the catalog.

use qtty::{Degrees, HourAngles, Radian};
use serde::{Deserialize, Serialize};

use crate::define_id_type;
use crate::models::TimeIndex;

define_id_type!(i64, TargetId);

/// A sky object to be observed for a fixed number of minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub ra: HourAngles,
    pub dec: Degrees,
    /// Required exposure, in horizon steps (minutes). Always positive.
    pub duration: TimeIndex,
    /// Ordering hint only; the objective ignores it.
    pub priority: f64,
}

impl Target {
    pub fn new(id: TargetId, ra: HourAngles, dec: Degrees, duration: TimeIndex) -> Self {
        Self {
            id,
            ra,
            dec,
            duration,
            priority: 0.0,
        }
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    pub fn ra_radians(&self) -> f64 {
        self.ra.to::<Radian>().value()
    }

    pub fn dec_radians(&self) -> f64 {
        self.dec.to::<Radian>().value()
    }
}
