use serde::*;

/// Minutes in one day; the planning horizon advances in one-minute steps.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Offset between Julian Day and Modified Julian Date.
pub const MJD_TO_JD: f64 = 2_400_000.5;

/// Modified Julian Date representation.
/// MJD 0 = 1858-11-17 00:00:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ModifiedJulianDate(qtty::Days);

impl ModifiedJulianDate {
    /// Create a new MJD value.
    pub fn new<V: Into<qtty::Days>>(v: V) -> Self {
        Self(v.into())
    }

    /// Raw MJD value as f64.
    pub fn value(&self) -> f64 {
        self.0.value()
    }

    /// Julian Day of the same instant, as expected by the Meeus routines.
    pub fn julian_day(&self) -> f64 {
        self.value() + MJD_TO_JD
    }

    /// The instant `minutes` later (or earlier, when negative).
    pub fn add_minutes(&self, minutes: f64) -> Self {
        Self::new(self.value() + minutes / MINUTES_PER_DAY)
    }

    /// Signed number of minutes from `self` to `later`.
    pub fn minutes_until(&self, later: ModifiedJulianDate) -> f64 {
        (later.value() - self.value()) * MINUTES_PER_DAY
    }

    /// Convert to Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn to_unix_timestamp(&self) -> f64 {
        (self.value() - 40587.0) * 86400.0
    }

    /// Create from Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn from_unix_timestamp(timestamp: f64) -> Self {
        Self::new(timestamp / 86400.0 + 40587.0)
    }

    /// Convert to chrono DateTime<Utc>, rounded to the millisecond.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        let millis = (self.to_unix_timestamp() * 1e3).round() as i64;
        chrono::DateTime::from_timestamp_millis(millis).unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH)
    }

    /// Create from chrono DateTime<Utc>.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self::from_unix_timestamp(dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9)
    }
}

impl From<f64> for ModifiedJulianDate {
    fn from(v: f64) -> Self {
        ModifiedJulianDate::new(v)
    }
}

impl std::fmt::Display for ModifiedJulianDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MJD {:.5}", self.value())
    }
}
