//! Sky positions needed by the visibility oracle.
//!
//! [`Ephemeris`] is the seam between the scheduler and whatever computes the
//! Moon, Sun and sidereal time. [`AstroEphemeris`] answers with the Meeus
//! algorithms of the `astro` crate; tests plug in deterministic fakes.

use std::f64::consts::PI;

use astro::angle::limit_to_two_PI;
use astro::coords::alt_frm_eq;
use astro::time::mn_sidr;
use qtty::{Degrees, HourAngles, Radian, Radians};
use serde::{Deserialize, Serialize};

use crate::models::{GeographicLocation, ModifiedJulianDate};

/// How far past the reference instant the twilight scan looks.
pub const TWILIGHT_SCAN_MINUTES: i64 = 36 * 60;

/// Apparent equatorial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialPosition {
    pub ra: HourAngles,
    pub dec: Degrees,
}

impl EquatorialPosition {
    pub fn new(ra: HourAngles, dec: Degrees) -> Self {
        Self { ra, dec }
    }
}

/// Start and end of one dark period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Twilight {
    pub dusk: ModifiedJulianDate,
    pub dawn: ModifiedJulianDate,
}

pub trait Ephemeris: Sync {
    /// Geocentric position of the Moon.
    fn moon_position(&self, mjd: ModifiedJulianDate) -> EquatorialPosition;

    /// Local mean sidereal time for an east-positive longitude, in `[0, 24)` h.
    fn local_sidereal_time(&self, mjd: ModifiedJulianDate, longitude: Degrees) -> HourAngles;

    /// Altitude of the Sun's centre seen from `location`.
    fn sun_altitude(&self, mjd: ModifiedJulianDate, location: &GeographicLocation) -> Degrees;

    /// First dark period at or after `reference`, where dark means the Sun is
    /// below `threshold`.
    ///
    /// Scans minute by minute over [`TWILIGHT_SCAN_MINUTES`]. When the Sun is
    /// already below the threshold at `reference`, the dusk is `reference`
    /// itself. Returns `None` when no dusk or no following dawn is found.
    fn twilight(
        &self,
        reference: ModifiedJulianDate,
        location: &GeographicLocation,
        threshold: Degrees,
    ) -> Option<Twilight> {
        let is_dark = |minute: i64| {
            self.sun_altitude(reference.add_minutes(minute as f64), location) < threshold
        };

        let dusk = (0..=TWILIGHT_SCAN_MINUTES).find(|&m| is_dark(m))?;
        let dawn = (dusk + 1..=TWILIGHT_SCAN_MINUTES).find(|&m| !is_dark(m))?;

        Some(Twilight {
            dusk: reference.add_minutes(dusk as f64),
            dawn: reference.add_minutes(dawn as f64),
        })
    }
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn moon_position(&self, mjd: ModifiedJulianDate) -> EquatorialPosition {
        (**self).moon_position(mjd)
    }

    fn local_sidereal_time(&self, mjd: ModifiedJulianDate, longitude: Degrees) -> HourAngles {
        (**self).local_sidereal_time(mjd, longitude)
    }

    fn sun_altitude(&self, mjd: ModifiedJulianDate, location: &GeographicLocation) -> Degrees {
        (**self).sun_altitude(mjd, location)
    }

    fn twilight(
        &self,
        reference: ModifiedJulianDate,
        location: &GeographicLocation,
        threshold: Degrees,
    ) -> Option<Twilight> {
        (**self).twilight(reference, location, threshold)
    }
}

/// Ephemeris backed by the `astro` crate (Meeus, *Astronomical Algorithms*).
#[derive(Debug, Clone, Copy, Default)]
pub struct AstroEphemeris;

impl AstroEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Greenwich mean sidereal time, radians in `[0, 2π)`.
    fn greenwich_sidereal_time(mjd: ModifiedJulianDate) -> f64 {
        limit_to_two_PI(mn_sidr(mjd.julian_day()))
    }

    /// Mean obliquity of the ecliptic, radians.
    fn obliquity(jd: f64) -> f64 {
        let t = (jd - 2_451_545.0) / 36_525.0;
        (23.439_291 - 0.013_004_2 * t).to_radians()
    }
}

/// Ecliptic (longitude, latitude) to equatorial (ra, dec), all in radians.
pub(crate) fn ecliptic_to_equatorial(long: f64, lat: f64, obliquity: f64) -> (f64, f64) {
    let ra = (long.sin() * obliquity.cos() - lat.tan() * obliquity.sin()).atan2(long.cos());
    let dec = (lat.sin() * obliquity.cos() + lat.cos() * obliquity.sin() * long.sin()).asin();
    (limit_to_two_PI(ra), dec)
}

fn equatorial_from_radians(ra: f64, dec: f64) -> EquatorialPosition {
    EquatorialPosition::new(
        Radians::new(ra).to::<qtty::HourAngle>(),
        Radians::new(dec).to::<qtty::Degree>(),
    )
}

impl Ephemeris for AstroEphemeris {
    fn moon_position(&self, mjd: ModifiedJulianDate) -> EquatorialPosition {
        let jd = mjd.julian_day();
        let (ecl, _distance_km) = astro::lunar::geocent_ecl_pos(jd);
        let (ra, dec) = ecliptic_to_equatorial(ecl.long, ecl.lat, Self::obliquity(jd));
        equatorial_from_radians(ra, dec)
    }

    fn local_sidereal_time(&self, mjd: ModifiedJulianDate, longitude: Degrees) -> HourAngles {
        let lst = limit_to_two_PI(
            Self::greenwich_sidereal_time(mjd) + longitude.to::<Radian>().value(),
        );
        Radians::new(lst).to::<qtty::HourAngle>()
    }

    fn sun_altitude(&self, mjd: ModifiedJulianDate, location: &GeographicLocation) -> Degrees {
        let jd = mjd.julian_day();
        let (ecl, _distance_au) = astro::sun::geocent_ecl_pos(jd);
        let (ra, dec) = ecliptic_to_equatorial(ecl.long, ecl.lat, Self::obliquity(jd));

        let lst = self.local_sidereal_time(mjd, location.longitude);
        let hour_angle = lst.to::<Radian>().value() - ra;
        let lat = location.latitude.to::<Radian>().value();
        Radians::new(alt_frm_eq(hour_angle, dec, lat)).to::<qtty::Degree>()
    }
}

/// Altitude of an equatorial position for a given hour angle and latitude.
pub fn altitude(hour_angle: HourAngles, dec: Degrees, latitude: Degrees) -> Degrees {
    let h = hour_angle.to::<Radian>().value();
    let d = dec.to::<Radian>().value();
    let phi = latitude.to::<Radian>().value();
    let sin_alt = phi.sin() * d.sin() + phi.cos() * d.cos() * h.cos();
    Radians::new(sin_alt.clamp(-1.0, 1.0).asin()).to::<qtty::Degree>()
}

/// Great-circle distance between two equatorial positions.
pub fn angular_separation(a: &EquatorialPosition, b: &EquatorialPosition) -> Degrees {
    let (ra1, dec1) = (a.ra.to::<Radian>().value(), a.dec.to::<Radian>().value());
    let (ra2, dec2) = (b.ra.to::<Radian>().value(), b.dec.to::<Radian>().value());
    let cos_sep = dec1.sin() * dec2.sin() + dec1.cos() * dec2.cos() * (ra1 - ra2).cos();
    let sep = cos_sep.clamp(-1.0, 1.0).acos();
    debug_assert!((0.0..=PI).contains(&sep));
    Radians::new(sep).to::<qtty::Degree>()
}
