//! Configuration error types.
//!
//! The frame simulation itself never fails; every problem it could run into
//! (zero fire interval, negative radius, arena smaller than a spawn zone) is
//! caught here when a match starts.

use std::fmt;

/// Reasons a match configuration is rejected.
#[derive(Debug)]
pub enum ConfigError {
    /// A value that must be strictly positive was zero or negative.
    NonPositive {
        /// Dotted name of the field (for logging).
        field: String,
        /// The value that was rejected.
        value: f64,
    },

    /// A value fell outside its allowed range.
    OutOfRange {
        field: String,
        value: f64,
        /// Human-readable description of the allowed range.
        range: &'static str,
    },

    /// A ranged archetype that fires no bolts.
    EmptyVolley {
        /// Archetype name.
        archetype: String,
    },

    /// The arena cannot hold both spawn zones.
    ArenaTooSmall {
        width: f32,
        height: f32,
        /// Smallest acceptable extent on either axis.
        min_extent: f32,
    },

    /// No preset carries this name.
    UnknownArchetype(String),

    /// Configuration JSON could not be read or parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive { field, value } => {
                write!(f, "'{}' must be greater than zero (got {})", field, value)
            }
            ConfigError::OutOfRange {
                field,
                value,
                range,
            } => write!(f, "'{}' = {} is outside {}", field, value, range),
            ConfigError::EmptyVolley { archetype } => {
                write!(f, "archetype '{}' fires zero bolts per volley", archetype)
            }
            ConfigError::ArenaTooSmall {
                width,
                height,
                min_extent,
            } => write!(
                f,
                "arena {}x{} is too small: both sides need at least {}",
                width, height, min_extent
            ),
            ConfigError::UnknownArchetype(name) => write!(f, "unknown archetype '{}'", name),
            ConfigError::Parse(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `value` is not strictly positive (NaN included).
pub fn ensure_positive(field: &str, value: f64) -> ConfigResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            field: field.to_string(),
            value,
        })
    }
}

/// Returns an error if `value` is outside `[min, max]` (NaN included).
pub fn ensure_within(
    field: &str,
    value: f64,
    min: f64,
    max: f64,
    range: &'static str,
) -> ConfigResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field: field.to_string(),
            value,
            range,
        })
    }
}
