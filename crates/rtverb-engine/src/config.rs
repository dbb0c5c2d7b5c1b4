//! Construction-time configuration of the reverb engine.
//!
//! Everything that fixes the shape of the filter network (sample rate,
//! buffer lengths, optional stages, predelay capacity) is decided here and
//! validated once, before any buffer is allocated.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use rtverb_core::FilterMode;

use crate::error::{Channel, EngineError};

/// Freeverb comb filter delay times (at 44.1kHz reference).
/// These are mutually prime to avoid resonances.
pub const COMB_TUNINGS_44K: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Freeverb allpass filter delay times (at 44.1kHz reference).
pub const ALLPASS_TUNINGS_44K: [usize; 4] = [556, 441, 341, 225];

/// Extra samples added to every right-channel buffer to decorrelate the banks.
pub const STEREO_SPREAD: usize = 23;

/// Reference sample rate for tuning constants.
pub const REFERENCE_RATE: f32 = 44100.0;

/// Number of combs per channel used by [`Tuning::default_for`].
pub const DEFAULT_NUM_COMBS: usize = 4;

/// Default predelay capacity in samples (100 ms at 48 kHz).
pub const DEFAULT_MAX_PREDELAY_SAMPLES: usize = 4800;

/// Default engine sample rate.
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

/// Scale delay times from reference rate to target rate.
fn scale_to_rate(samples: usize, target_rate: f32) -> usize {
    let scaled = libm::roundf(samples as f32 * target_rate / REFERENCE_RATE);
    if scaled.is_finite() && scaled >= 1.0 {
        scaled as usize
    } else {
        1
    }
}

/// Buffer lengths of every comb and allpass, in samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning {
    /// Left comb bank.
    pub comb_left: Vec<usize>,
    /// Right comb bank.
    pub comb_right: Vec<usize>,
    /// Left allpass chain, in processing order.
    pub allpass_left: Vec<usize>,
    /// Right allpass chain, in processing order.
    pub allpass_right: Vec<usize>,
}

impl Tuning {
    /// Classic Freeverb tuning with the first `num_combs` combs (1 to 8),
    /// scaled from 44.1 kHz to `sample_rate`.
    pub fn freeverb(num_combs: usize, sample_rate: f32) -> Self {
        let num_combs = num_combs.clamp(1, COMB_TUNINGS_44K.len());
        let combs = &COMB_TUNINGS_44K[..num_combs];

        Self {
            comb_left: combs
                .iter()
                .map(|&n| scale_to_rate(n, sample_rate))
                .collect(),
            comb_right: combs
                .iter()
                .map(|&n| scale_to_rate(n + STEREO_SPREAD, sample_rate))
                .collect(),
            allpass_left: ALLPASS_TUNINGS_44K
                .iter()
                .map(|&n| scale_to_rate(n, sample_rate))
                .collect(),
            allpass_right: ALLPASS_TUNINGS_44K
                .iter()
                .map(|&n| scale_to_rate(n + STEREO_SPREAD, sample_rate))
                .collect(),
        }
    }

    /// [`DEFAULT_NUM_COMBS`]-comb Freeverb tuning for `sample_rate`.
    pub fn default_for(sample_rate: f32) -> Self {
        Self::freeverb(DEFAULT_NUM_COMBS, sample_rate)
    }

    /// Combs per channel.
    pub fn num_combs(&self) -> usize {
        self.comb_left.len()
    }

    /// Shortest comb buffer across both channels.
    pub fn shortest_comb(&self) -> Option<usize> {
        self.comb_left
            .iter()
            .chain(&self.comb_right)
            .copied()
            .min()
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.comb_left.is_empty() || self.comb_right.is_empty() {
            return Err(EngineError::EmptyCombBank);
        }
        check_bank("comb", &self.comb_left, &self.comb_right)?;
        check_bank("allpass", &self.allpass_left, &self.allpass_right)
    }
}

fn check_bank(kind: &'static str, left: &[usize], right: &[usize]) -> Result<(), EngineError> {
    if left.len() != right.len() {
        return Err(EngineError::BankSizeMismatch {
            kind,
            left: left.len(),
            right: right.len(),
        });
    }
    for (channel, bank) in [(Channel::Left, left), (Channel::Right, right)] {
        if let Some(index) = bank.iter().position(|&n| n == 0) {
            return Err(EngineError::ZeroLengthFilter {
                kind,
                channel,
                index,
            });
        }
    }
    Ok(())
}

/// How the predelay stage reacts to length changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredelayMode {
    /// No predelay stage.
    #[default]
    Off,
    /// Length changes clear the line.
    Simple,
    /// Length changes crossfade over 20 ms.
    Crossfade,
}

/// Everything needed to build a [`ReverbEngine`](crate::ReverbEngine).
///
/// # Example
///
/// ```rust
/// use rtverb_engine::{EngineConfig, PredelayMode, ReverbEngine, Tuning};
///
/// let config = EngineConfig::new(44100.0)
///     .with_tuning(Tuning::freeverb(8, 44100.0))
///     .with_predelay(PredelayMode::Crossfade)
///     .with_max_predelay_samples(8820);
///
/// let engine = ReverbEngine::with_config(config).unwrap();
/// assert_eq!(engine.num_combs(), 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Buffer lengths.
    pub tuning: Tuning,
    /// Input filter response, or `None` to leave the stage out.
    pub input_filter: Option<FilterMode>,
    /// Predelay stage.
    pub predelay: PredelayMode,
    /// Predelay capacity in samples.
    pub max_predelay_samples: usize,
}

impl EngineConfig {
    /// Default configuration at `sample_rate`: 4-comb Freeverb tuning,
    /// lowpass input filter, no predelay.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            tuning: Tuning::default_for(sample_rate),
            input_filter: Some(FilterMode::Lowpass),
            predelay: PredelayMode::Off,
            max_predelay_samples: DEFAULT_MAX_PREDELAY_SAMPLES,
        }
    }

    /// Replace the tuning.
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Select the input filter (`None` removes the stage).
    pub fn with_input_filter(mut self, mode: Option<FilterMode>) -> Self {
        self.input_filter = mode;
        self
    }

    /// Select the predelay stage.
    pub fn with_predelay(mut self, mode: PredelayMode) -> Self {
        self.predelay = mode;
        self
    }

    /// Set the predelay capacity in samples.
    pub fn with_max_predelay_samples(mut self, samples: usize) -> Self {
        self.max_predelay_samples = samples;
        self
    }

    /// Check that an engine can be built from this configuration.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(EngineError::InvalidSampleRate(self.sample_rate));
        }
        self.tuning.validate()?;
        if self.predelay != PredelayMode::Off && self.max_predelay_samples == 0 {
            return Err(EngineError::ZeroPredelayCapacity);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}
