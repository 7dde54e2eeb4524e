//! Visibility oracle: can a telescope observe a target at a given instant?

use qtty::{Degrees, HourAngles};

use crate::models::{ModifiedJulianDate, Target, Telescope};
use crate::services::ephemeris::{altitude, angular_separation, Ephemeris, EquatorialPosition};

/// Altitude limit at or below which the height check is skipped.
pub const HEIGHT_CHECK_DISABLED: Degrees = Degrees::new(-90.0);

/// Outcome of a single oracle evaluation. Checks run in declaration order and
/// the first failing one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Visible,
    MoonTooClose,
    HourAngleOutOfRange,
    DeclinationOutOfRange,
    BelowMinimumHeight,
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Hour angle of `target` folded into `[0, 24)` h.
pub fn hour_angle(lst: HourAngles, target: &Target) -> HourAngles {
    (lst - target.ra).wrap_pos()
}

/// Evaluate every pointing limit of `telescope` for `target` at `mjd`.
pub fn evaluate<E: Ephemeris + ?Sized>(
    telescope: &Telescope,
    target: &Target,
    mjd: ModifiedJulianDate,
    ephemeris: &E,
) -> Visibility {
    let limits = &telescope.limits;

    let moon = ephemeris.moon_position(mjd);
    let position = EquatorialPosition::new(target.ra, target.dec);
    if angular_separation(&position, &moon) <= limits.min_lunar_distance {
        return Visibility::MoonTooClose;
    }

    let lst = ephemeris.local_sidereal_time(mjd, telescope.location.longitude);
    let ha = hour_angle(lst, target);
    let full_turn = HourAngles::new(24.0);
    if ha >= limits.mount_hour_angle && full_turn - ha >= limits.mount_hour_angle {
        return Visibility::HourAngleOutOfRange;
    }

    if target.dec >= limits.min_dec_south || target.dec <= -limits.min_dec_north {
        return Visibility::DeclinationOutOfRange;
    }

    if limits.min_height > HEIGHT_CHECK_DISABLED
        && altitude(ha, target.dec, telescope.location.latitude) < limits.min_height
    {
        return Visibility::BelowMinimumHeight;
    }

    Visibility::Visible
}

/// `true` when every pointing limit holds at `mjd`.
pub fn is_visible<E: Ephemeris + ?Sized>(
    telescope: &Telescope,
    target: &Target,
    mjd: ModifiedJulianDate,
    ephemeris: &E,
) -> bool {
    evaluate(telescope, target, mjd, ephemeris).is_visible()
}
