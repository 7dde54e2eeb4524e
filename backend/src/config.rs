//! Telescope configuration file support.
//!
//! A configuration describes one observatory and the pointing limits of its
//! mount, as TOML:
//!
//! ```toml
//! [observatory]
//! latitude = 41.5
//! longitude = 2.1
//! altitude = 500
//!
//! [limits]
//! min_height = 20
//! min_lunar_dist = 30
//! min_dec_N = 90
//! min_dec_S = 90
//! mount_HA = 4
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use qtty::{Degrees, HourAngles, Meters};

use crate::models::{GeographicLocation, Telescope, TelescopeId, VisibilityLimits};

/// Environment variable naming a directory of telescope configurations.
pub const CONFIG_DIR_ENV: &str = "SCHEDULER_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("[{section}] {field}: {message}")]
    InvalidValue {
        section: &'static str,
        field: &'static str,
        message: String,
    },

    #[error("config file '{0}' does not exist")]
    NotFound(PathBuf),
}

/// Contents of a telescope configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelescopeConfig {
    pub observatory: ObservatorySettings,
    pub limits: LimitSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservatorySettings {
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
    /// Meters above sea level.
    pub altitude: f64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Mount limits, in degrees except `mount_HA` (hours).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitSettings {
    pub min_height: f64,
    pub min_lunar_dist: f64,
    #[serde(rename = "min_dec_N")]
    pub min_dec_north: f64,
    #[serde(rename = "min_dec_S")]
    pub min_dec_south: f64,
    #[serde(rename = "mount_HA")]
    pub mount_hour_angle: f64,
}

impl TelescopeConfig {
    /// Load a telescope configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: TelescopeConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        Ok(config)
    }

    /// Resolve `path` (see [`resolve_config_path`]) and load it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_file(resolve_config_path(path)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let o = &self.observatory;
        let l = &self.limits;
        check("observatory", "latitude", o.latitude, -90.0, 90.0)?;
        check("observatory", "longitude", o.longitude, -180.0, 360.0)?;
        check("observatory", "altitude", o.altitude, -500.0, 10_000.0)?;
        check("limits", "min_height", l.min_height, -90.0, 90.0)?;
        check("limits", "min_lunar_dist", l.min_lunar_dist, 0.0, 180.0)?;
        check("limits", "min_dec_N", l.min_dec_north, -90.0, 180.0)?;
        check("limits", "min_dec_S", l.min_dec_south, -90.0, 180.0)?;
        check("limits", "mount_HA", l.mount_hour_angle, 0.0, 12.0)?;
        Ok(())
    }

    /// Build the telescope described by this configuration.
    pub fn to_telescope(&self, id: TelescopeId) -> Telescope {
        let name = self
            .observatory
            .name
            .clone()
            .unwrap_or_else(|| format!("Telescope {id}"));
        Telescope::new(
            id,
            name,
            GeographicLocation::new(
                Degrees::new(self.observatory.latitude),
                Degrees::new(self.observatory.longitude),
                Meters::new(self.observatory.altitude),
            ),
            VisibilityLimits {
                min_height: Degrees::new(self.limits.min_height),
                min_lunar_distance: Degrees::new(self.limits.min_lunar_dist),
                min_dec_north: Degrees::new(self.limits.min_dec_north),
                min_dec_south: Degrees::new(self.limits.min_dec_south),
                mount_hour_angle: HourAngles::new(self.limits.mount_hour_angle),
            },
        )
    }
}

fn check(
    section: &'static str,
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::InvalidValue {
            section,
            field,
            message: format!("{value} is outside [{min}, {max}]"),
        });
    }
    Ok(())
}

/// Locate a configuration file.
///
/// `path` is used as given when it exists. Otherwise it is looked up under
/// `$SCHEDULER_CONFIG` when that variable is set, else under
/// `$HOME/.config/scheduler`.
pub fn resolve_config_path<P: AsRef<Path>>(path: P) -> Result<PathBuf, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(path.to_path_buf());
    }

    let fallback = match env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir).join(path),
        None => match env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".config/scheduler").join(path),
            None => return Err(ConfigError::NotFound(path.to_path_buf())),
        },
    };

    if fallback.exists() {
        Ok(fallback)
    } else {
        Err(ConfigError::NotFound(fallback))
    }
}
