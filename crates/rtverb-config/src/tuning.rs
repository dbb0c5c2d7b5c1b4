//! Freeverb tuning and explicit buffer-length tables.
//!
//! The reference tables themselves live with [`Tuning`] in `rtverb-engine`;
//! this module adds the checked constructor used for configuration files and
//! the serialized form of a hand-made tuning.

use serde::{Deserialize, Serialize};

use rtverb_engine::{COMB_TUNINGS_44K, Tuning};

use crate::error::ConfigError;

/// Largest comb count the reference table supports.
pub const MAX_COMBS: usize = COMB_TUNINGS_44K.len();

/// Freeverb tuning with `num_combs` combs per channel, scaled to `sample_rate`.
///
/// Unlike [`Tuning::freeverb`], out-of-range input is reported rather than clamped.
///
/// # Example
///
/// ```rust
/// use rtverb_config::freeverb_tuning;
///
/// let tuning = freeverb_tuning(4, 44100.0)?;
/// assert_eq!(tuning.comb_left, vec![1116, 1188, 1277, 1356]);
/// assert_eq!(tuning.comb_right[0], 1116 + 23);
/// assert!(freeverb_tuning(9, 44100.0).is_err());
/// # Ok::<(), rtverb_config::ConfigError>(())
/// ```
pub fn freeverb_tuning(num_combs: usize, sample_rate: f32) -> Result<Tuning, ConfigError> {
    if !(1..=MAX_COMBS).contains(&num_combs) {
        return Err(ConfigError::InvalidCombCount(num_combs));
    }
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(ConfigError::InvalidSampleRate(sample_rate));
    }
    Ok(Tuning::freeverb(num_combs, sample_rate))
}

/// Explicit buffer lengths in samples, as written in an engine file.
///
/// ```toml
/// [tuning]
/// comb_left = [1116, 1188]
/// comb_right = [1139, 1211]
/// allpass_left = [556, 441]
/// allpass_right = [579, 464]
/// ```
///
/// Lengths are used as given, at any sample rate. Consistency (equal bank
/// sizes, no zero lengths) is checked when the engine is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TuningTable {
    /// Left comb bank.
    pub comb_left: Vec<usize>,
    /// Right comb bank.
    pub comb_right: Vec<usize>,
    /// Left allpass chain.
    #[serde(default)]
    pub allpass_left: Vec<usize>,
    /// Right allpass chain.
    #[serde(default)]
    pub allpass_right: Vec<usize>,
}

impl From<TuningTable> for Tuning {
    fn from(t: TuningTable) -> Self {
        Self {
            comb_left: t.comb_left,
            comb_right: t.comb_right,
            allpass_left: t.allpass_left,
            allpass_right: t.allpass_right,
        }
    }
}

impl From<Tuning> for TuningTable {
    fn from(t: Tuning) -> Self {
        Self {
            comb_left: t.comb_left,
            comb_right: t.comb_right,
            allpass_left: t.allpass_left,
            allpass_right: t.allpass_right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comb_count_bounds() {
        assert!(matches!(
            freeverb_tuning(0, 48000.0),
            Err(ConfigError::InvalidCombCount(0))
        ));
        assert!(freeverb_tuning(1, 48000.0).is_ok());
        assert_eq!(freeverb_tuning(8, 48000.0).unwrap().num_combs(), 8);
        assert!(matches!(
            freeverb_tuning(9, 48000.0),
            Err(ConfigError::InvalidCombCount(9))
        ));
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        assert!(matches!(
            freeverb_tuning(4, 0.0),
            Err(ConfigError::InvalidSampleRate(_))
        ));
        assert!(freeverb_tuning(4, f32::NAN).is_err());
    }

    #[test]
    fn test_matches_engine_tuning() {
        assert_eq!(
            freeverb_tuning(4, 96000.0).unwrap(),
            Tuning::default_for(96000.0)
        );
    }

    #[test]
    fn test_table_allpasses_optional() {
        let table: TuningTable = toml::from_str(
            r#"
comb_left = [100, 110]
comb_right = [123, 133]
"#,
        )
        .unwrap();
        let tuning: Tuning = table.into();
        assert_eq!(tuning.num_combs(), 2);
        assert!(tuning.allpass_left.is_empty());
    }
}
