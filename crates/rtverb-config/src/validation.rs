//! Parameter validation for presets read from outside the program.
//!
//! The engine clamps whatever it is given, so nothing here is needed for
//! safety. Validation exists so a preset file with a typo (`room_size = 8`)
//! is reported instead of silently becoming a different sound.
//!
//! # Example
//!
//! ```rust
//! use rtverb_config::{validate_parameters, ValidationError};
//! use rtverb_engine::ReverbParameters;
//!
//! assert!(validate_parameters(&ReverbParameters::DEFAULT).is_ok());
//!
//! let wild = ReverbParameters { room_size: 8.0, ..ReverbParameters::DEFAULT };
//! assert!(matches!(
//!     validate_parameters(&wild),
//!     Err(ValidationError::OutOfRange { param: "room_size", .. })
//! ));
//! ```

use rtverb_engine::ReverbParameters;
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: &'static str,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Parameter value is NaN or infinite.
    #[error("parameter '{param}' is not a finite number")]
    NotFinite {
        /// Name of the parameter.
        param: &'static str,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Accepted range of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Field name, as used in preset files.
    pub name: &'static str,
    /// Minimum value (inclusive).
    pub min: f32,
    /// Maximum value (inclusive).
    pub max: f32,
}

impl ParamRange {
    const fn new(name: &'static str, min: f32, max: f32) -> Self {
        Self { name, min, max }
    }

    /// Check a single value against this range.
    pub fn check(&self, value: f32) -> ValidationResult<()> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { param: self.name });
        }
        if value < self.min || value > self.max {
            return Err(ValidationError::OutOfRange {
                param: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Accepted ranges, in [`ReverbParameters::to_array`] order.
///
/// Mode, predelay, cutoff and resonance are open-ended in the engine; the
/// upper bounds here are what a hand-written preset can sensibly mean.
pub const PARAMETER_RANGES: [ParamRange; 9] = [
    ParamRange::new("room_size", 0.0, 1.0),
    ParamRange::new("damp", 0.0, 1.0),
    ParamRange::new("wet", 0.0, 1.0),
    ParamRange::new("dry", 0.0, 1.0),
    ParamRange::new("width", 0.0, 1.0),
    ParamRange::new("mode", 0.0, 1.0),
    ParamRange::new("predelay", 0.0, 1.0),
    ParamRange::new("cutoff", 10.0, 48_000.0),
    ParamRange::new("resonance", -24.0, 24.0),
];

/// Look up the accepted range of a parameter by name.
pub fn param_range(name: &str) -> Option<&'static ParamRange> {
    PARAMETER_RANGES.iter().find(|range| range.name == name)
}

/// Validate every field of a parameter set.
///
/// A single problem is returned as itself; several are collected into
/// [`ValidationError::Multiple`].
pub fn validate_parameters(params: &ReverbParameters) -> ValidationResult<()> {
    let mut errors: Vec<ValidationError> = PARAMETER_RANGES
        .iter()
        .zip(params.to_array())
        .filter_map(|(range, value)| range.check(value).err())
        .collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validate a predelay against a line capacity at a sample rate.
pub fn validate_predelay(
    seconds: f32,
    max_predelay_samples: usize,
    sample_rate: f32,
) -> ValidationResult<()> {
    ParamRange::new("predelay", 0.0, max_predelay_samples as f32 / sample_rate).check(seconds)
}
