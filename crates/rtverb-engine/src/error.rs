//! Construction-time errors.
//!
//! Processing never fails: every runtime parameter is clamped. The only
//! errors are configurations that cannot be built at all.

use thiserror::Error;

/// Which side of the stereo network a filter bank belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Left bank.
    Left,
    /// Right bank.
    Right,
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Errors returned when an [`EngineConfig`](crate::EngineConfig) cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The sample rate is zero, negative or not a number.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// The tuning has no comb filters.
    #[error("comb bank is empty")]
    EmptyCombBank,

    /// The left and right banks of a filter type differ in size.
    #[error("{kind} banks differ in size: {left} left, {right} right")]
    BankSizeMismatch {
        /// "comb" or "allpass".
        kind: &'static str,
        /// Filters in the left bank.
        left: usize,
        /// Filters in the right bank.
        right: usize,
    },

    /// A comb or allpass was given a zero-length buffer.
    #[error("{kind} {index} ({channel}) has a zero-length buffer")]
    ZeroLengthFilter {
        /// "comb" or "allpass".
        kind: &'static str,
        /// Bank the filter belongs to.
        channel: Channel,
        /// Position within the bank.
        index: usize,
    },

    /// Predelay is enabled but may hold no samples.
    #[error("predelay enabled with zero capacity")]
    ZeroPredelayCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::ZeroLengthFilter {
            kind: "comb",
            channel: Channel::Right,
            index: 2,
        };
        assert_eq!(err.to_string(), "comb 2 (right) has a zero-length buffer");

        let err = EngineError::BankSizeMismatch {
            kind: "allpass",
            left: 4,
            right: 3,
        };
        assert_eq!(
            err.to_string(),
            "allpass banks differ in size: 4 left, 3 right"
        );
    }
}
