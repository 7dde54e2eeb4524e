//! Telescopes and the observing limits of their mounts.

use qtty::{Degrees, HourAngles, Meters};
use serde::{Deserialize, Serialize};

use crate::define_id_type;

define_id_type!(i64, TelescopeId);

/// Geodetic position of an observatory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeographicLocation {
    pub latitude: Degrees,
    /// East positive.
    pub longitude: Degrees,
    pub altitude: Meters,
}

impl GeographicLocation {
    pub fn new(latitude: Degrees, longitude: Degrees, altitude: Meters) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

/// Pointing limits applied by the visibility oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityLimits {
    /// Minimum target altitude; -90° disables the check.
    pub min_height: Degrees,
    /// Minimum angular distance between target and Moon.
    pub min_lunar_distance: Degrees,
    /// Targets must satisfy `dec > -min_dec_north`.
    pub min_dec_north: Degrees,
    /// Targets must satisfy `dec < min_dec_south`.
    pub min_dec_south: Degrees,
    /// Largest hour-angle magnitude the mount can reach.
    pub mount_hour_angle: HourAngles,
}

impl Default for VisibilityLimits {
    /// Limits that accept every target.
    fn default() -> Self {
        Self {
            min_height: Degrees::new(-90.0),
            min_lunar_distance: Degrees::new(0.0),
            min_dec_north: Degrees::new(91.0),
            min_dec_south: Degrees::new(91.0),
            mount_hour_angle: HourAngles::new(12.0),
        }
    }
}

/// An observing station. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telescope {
    pub id: TelescopeId,
    pub name: String,
    pub location: GeographicLocation,
    pub limits: VisibilityLimits,
}

impl Telescope {
    pub fn new(
        id: TelescopeId,
        name: impl Into<String>,
        location: GeographicLocation,
        limits: VisibilityLimits,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            limits,
        }
    }
}
