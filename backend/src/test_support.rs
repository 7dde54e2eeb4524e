//! Deterministic sky and fixtures shared by the unit and integration tests.
//!
//! Compiled for `cfg(test)` and, for the integration tests, behind the
//! `test-support` feature.
//!
//! Sidereal time advances one hour per sixty horizon minutes, so a target of
//! right ascension `ra` is within `h` hours of the meridian exactly between
//! minutes `60 (ra - h)` and `60 (ra + h)`.

use qtty::{Degrees, HourAngles, Meters};

use crate::models::{
    GeographicLocation, ModifiedJulianDate, Target, TargetId, Telescope, TelescopeId,
    VisibilityLimits,
};
use crate::services::ephemeris::{Ephemeris, EquatorialPosition};
use crate::services::visibility::HEIGHT_CHECK_DISABLED;

pub const ORIGIN: f64 = 60000.0;

pub struct ClockworkSky {
    pub origin: ModifiedJulianDate,
    pub moon: EquatorialPosition,
    /// Dark period, in minutes from `origin`.
    pub dark: (i64, i64),
}

impl Default for ClockworkSky {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockworkSky {
    pub fn new() -> Self {
        Self {
            origin: ModifiedJulianDate::new(ORIGIN),
            moon: EquatorialPosition::new(HourAngles::new(0.0), Degrees::new(-89.0)),
            dark: (0, 720),
        }
    }

    fn minute(&self, mjd: ModifiedJulianDate) -> i64 {
        self.origin.minutes_until(mjd).round() as i64
    }
}

impl Ephemeris for ClockworkSky {
    fn moon_position(&self, _mjd: ModifiedJulianDate) -> EquatorialPosition {
        self.moon
    }

    fn local_sidereal_time(&self, mjd: ModifiedJulianDate, _longitude: Degrees) -> HourAngles {
        HourAngles::new(self.minute(mjd) as f64 / 60.0).wrap_pos()
    }

    fn sun_altitude(&self, mjd: ModifiedJulianDate, _location: &GeographicLocation) -> Degrees {
        let m = self.minute(mjd);
        if self.dark.0 <= m && m < self.dark.1 {
            Degrees::new(-30.0)
        } else {
            Degrees::new(10.0)
        }
    }
}

/// Telescope reaching `mount_ha` hours either side of the meridian, with
/// every other limit open.
pub fn telescope(id: i64, mount_ha: f64) -> Telescope {
    telescope_with_dec_limit(id, mount_ha, 91.0)
}

/// Like [`telescope`], restricted to the declination band
/// `(-dec_limit, dec_limit)`.
pub fn telescope_with_dec_limit(id: i64, mount_ha: f64, dec_limit: f64) -> Telescope {
    Telescope::new(
        TelescopeId(id),
        format!("T{id}"),
        GeographicLocation::new(Degrees::new(41.5), Degrees::new(2.1), Meters::new(500.0)),
        VisibilityLimits {
            min_height: HEIGHT_CHECK_DISABLED,
            min_lunar_distance: Degrees::new(0.0),
            min_dec_north: Degrees::new(dec_limit),
            min_dec_south: Degrees::new(dec_limit),
            mount_hour_angle: HourAngles::new(mount_ha),
        },
    )
}

/// Target at declination +10.
pub fn target(id: i64, ra_hours: f64, duration: i64) -> Target {
    target_at(id, ra_hours, 10.0, duration)
}

pub fn target_at(id: i64, ra_hours: f64, dec: f64, duration: i64) -> Target {
    Target::new(
        TargetId(id),
        HourAngles::new(ra_hours),
        Degrees::new(dec),
        duration,
    )
}
