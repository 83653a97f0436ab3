//! Configuration error types.
//!
//! The flight core never fails at runtime: fuel and cooldown self-clamp.
//! Everything that *can* be wrong is a tuning or level-layout fault, and those
//! are caught here when the configuration is loaded, not mid-flight.
//!
//! ## Usage
//!
//! ```rust
//! use lander::error::{validate_positive, LanderResult};
//!
//! fn check(fuel_max: f32) -> LanderResult<()> {
//!     validate_positive("fuel_max", fuel_max)?;
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Top-level error enum for the lander game.
#[derive(Debug, Clone, PartialEq)]
pub enum LanderError {
    /// A tuning value is outside the range the flight model accepts.
    InvalidConstant {
        /// Name of the config key (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the accepted range.
        safe_range: &'static str,
    },

    /// A landing pad's score multiplier is zero, negative, or not a number.
    InvalidPadMultiplier {
        /// Index of the pad in the `pads` list.
        pad_index: usize,
        value: f32,
    },

    /// The configuration file could not be parsed.
    ConfigParse {
        path: String,
        message: String,
    },
}

impl fmt::Display for LanderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanderError::InvalidConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside accepted range {}",
                name, value, safe_range
            ),
            LanderError::InvalidPadMultiplier { pad_index, value } => write!(
                f,
                "landing pad #{} has invalid score multiplier {} (must be finite and > 0)",
                pad_index, value
            ),
            LanderError::ConfigParse { path, message } => {
                write!(f, "failed to parse '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for LanderError {}

/// Convenience alias: a `Result` using `LanderError` as the error type.
pub type LanderResult<T> = Result<T, LanderError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> LanderResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LanderError::InvalidConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and not negative.
pub fn validate_non_negative(name: &'static str, value: f32) -> LanderResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LanderError::InvalidConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite.  Used for coordinates.
pub fn validate_finite(name: &'static str, value: f32) -> LanderResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LanderError::InvalidConstant {
            name,
            value,
            safe_range: "finite",
        })
    }
}

/// Returns an error unless `value` lies in the closed interval [-1, 1].
///
/// Used for dot-product thresholds, which are cosines.
pub fn validate_unit_interval(name: &'static str, value: f32) -> LanderResult<()> {
    if (-1.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(LanderError::InvalidConstant {
            name,
            value,
            safe_range: "[-1.0, 1.0]",
        })
    }
}

/// Returns an error unless a pad score multiplier is finite and strictly positive.
pub fn validate_pad_multiplier(pad_index: usize, value: f32) -> LanderResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LanderError::InvalidPadMultiplier { pad_index, value })
    }
}
