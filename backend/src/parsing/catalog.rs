//! Line-oriented target catalog.
//!
//! One target per line, whitespace separated:
//!
//! ```text
//! # id  RA (h:m:s)  DEC (d:m:s)  [duration min]  [priority]
//! 1     10:30:00    +45:00:00    40             2.5
//! 2     14:20:00    -20:30:00
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use qtty::{Degrees, HourAngles};

use crate::models::{Target, TargetId, TimeIndex};

/// Observation length used when a line has no duration column.
pub const DEFAULT_DURATION: TimeIndex = 30;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("line {line}: target {id} is listed twice")]
    DuplicateId { line: usize, id: TargetId },
}

/// Values for the optional columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogDefaults {
    pub duration: TimeIndex,
    pub priority: f64,
}

impl Default for CatalogDefaults {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            priority: 0.0,
        }
    }
}

/// Read and parse a catalog file.
pub fn load_catalog<P: AsRef<Path>>(
    path: P,
    defaults: &CatalogDefaults,
) -> Result<Vec<Target>, CatalogError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&content, defaults)
}

/// Parse catalog text. Line numbers in errors are 1-based.
pub fn parse_catalog(content: &str, defaults: &CatalogDefaults) -> Result<Vec<Target>, CatalogError> {
    let mut targets = Vec::new();
    let mut seen = HashSet::new();

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let target = parse_line(text, defaults)
            .map_err(|message| CatalogError::Malformed { line, message })?;
        if !seen.insert(target.id) {
            return Err(CatalogError::DuplicateId {
                line,
                id: target.id,
            });
        }
        targets.push(target);
    }

    Ok(targets)
}

fn parse_line(text: &str, defaults: &CatalogDefaults) -> Result<Target, String> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if !(3..=5).contains(&fields.len()) {
        return Err(format!(
            "expected 3 to 5 columns (id ra dec [duration [priority]]), found {}",
            fields.len()
        ));
    }

    let id: TargetId = fields[0]
        .parse()
        .map_err(|_| format!("invalid target id '{}'", fields[0]))?;

    let ra = parse_sexagesimal(fields[1]).map_err(|e| format!("right ascension: {e}"))?;
    if !(0.0..24.0).contains(&ra) {
        return Err(format!("right ascension {ra} h is outside [0, 24)"));
    }

    let dec = parse_sexagesimal(fields[2]).map_err(|e| format!("declination: {e}"))?;
    if !(-90.0..=90.0).contains(&dec) {
        return Err(format!("declination {dec} deg is outside [-90, 90]"));
    }

    let duration = match fields.get(3) {
        Some(raw) => raw
            .parse::<TimeIndex>()
            .map_err(|_| format!("invalid duration '{raw}'"))?,
        None => defaults.duration,
    };
    if duration <= 0 {
        return Err(format!("duration must be positive, got {duration}"));
    }

    let priority = match fields.get(4) {
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| format!("invalid priority '{raw}'"))?,
        None => defaults.priority,
    };

    Ok(Target::new(id, HourAngles::new(ra), Degrees::new(dec), duration).with_priority(priority))
}

/// Parse `[+-]a[:b[:c]]` as `a + b/60 + c/3600`, with the sign applying to the
/// whole value.
pub fn parse_sexagesimal(text: &str) -> Result<f64, String> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };

    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(format!("'{text}' is not of the form a:b:c"));
    }

    let mut value = 0.0;
    let mut scale = 1.0;
    for (position, part) in parts.iter().enumerate() {
        let component: f64 = part
            .parse()
            .map_err(|_| format!("'{part}' in '{text}' is not a number"))?;
        if !component.is_finite() || component < 0.0 {
            return Err(format!("'{part}' in '{text}' must be a non-negative number"));
        }
        if position > 0 && component >= 60.0 {
            return Err(format!("'{part}' in '{text}' must be below 60"));
        }
        value += component / scale;
        scale *= 60.0;
    }

    Ok(sign * value)
}
