//! Astronomical night computation service.
//!
//! Turns the first dark period after a reference instant into the planning
//! horizon. Dark means the Sun's centre is below [`ASTRONOMICAL_TWILIGHT`].

use log::{info, warn};
use qtty::Degrees;
use serde::{Deserialize, Serialize};

use crate::models::{GeographicLocation, Horizon, ModifiedJulianDate, TimeIndex};
use crate::services::ephemeris::Ephemeris;

/// Sun altitude threshold of the observing night.
pub const ASTRONOMICAL_TWILIGHT: Degrees = Degrees::new(-17.5);

/// How the planning horizon is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonMode {
    /// Dusk to dawn of the night following the reference instant.
    #[default]
    Night,
    /// A fixed number of minutes from the reference instant.
    Fixed,
}

/// Horizon from astronomical dusk to dawn of the night starting at or after
/// `reference`, truncated to whole minutes.
pub fn compute_night_horizon<E: Ephemeris + ?Sized>(
    reference: ModifiedJulianDate,
    location: &GeographicLocation,
    ephemeris: &E,
) -> Option<Horizon> {
    let night = ephemeris.twilight(reference, location, ASTRONOMICAL_TWILIGHT)?;
    Some(Horizon::between(night.dusk, night.dawn))
}

/// Planning horizon for `mode`. A fixed horizon spans `max_steps` minutes
/// from `reference`; a night that cannot be found (polar summer) falls back
/// to it.
pub fn planning_horizon<E: Ephemeris + ?Sized>(
    mode: HorizonMode,
    reference: ModifiedJulianDate,
    location: &GeographicLocation,
    ephemeris: &E,
    max_steps: TimeIndex,
) -> Horizon {
    let horizon = match mode {
        HorizonMode::Fixed => Horizon::new(reference, max_steps),
        HorizonMode::Night => match compute_night_horizon(reference, location, ephemeris) {
            Some(horizon) => horizon,
            None => {
                warn!(
                    "No astronomical night within reach of {}; using a fixed horizon",
                    reference
                );
                Horizon::new(reference, max_steps)
            }
        },
    };

    info!(
        "Planning horizon: {} steps from {} ({})",
        horizon.len(),
        horizon.origin().to_datetime().format("%Y-%m-%d %H:%M UTC"),
        horizon.origin()
    );
    horizon
}
