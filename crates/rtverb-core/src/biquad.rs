//! Biquad (bi-quadratic) filter and the reverb input conditioning filter.
//!
//! [`Biquad`] is the generic Direct Form I section. [`InputFilter`] wraps it
//! with a resonant 2-pole lowpass/highpass design (DAFX, 2nd ed., Zölzer) and
//! rate-limited coefficient updates, so that sweeping the cutoff or resonance
//! cannot make the filter jump audibly between two calls.

use core::f32::consts::PI;
use libm::tanf;

use crate::db_to_factor;

/// Lowest cutoff the input filter accepts, in Hz.
pub const MIN_CUTOFF_HZ: f32 = 10.0;

/// Upper bound of the normalized cutoff (`cutoff / sample_rate`), just below Nyquist.
pub const MAX_NORMALIZED_CUTOFF: f32 = 0.49;

/// Maximum ratio between two consecutively applied cutoffs.
pub const CUTOFF_SMOOTHING: f32 = 1.2;

/// Maximum step between two consecutively applied resonances, in dB.
pub const RESONANCE_SMOOTHING_DB: f32 = 1.0;

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Feedforward coefficients
    b0: f32,
    b1: f32,
    b2: f32,

    /// Feedback coefficients (a0 normalized to 1)
    a1: f32,
    a2: f32,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the biquad coefficients.
    ///
    /// Normalizes by `a0` internally.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Resets the coefficients to a passthrough without touching the history.
    pub fn set_passthrough(&mut self) {
        self.set_coefficients(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    }

    /// Current `(b0, b1, b2, a1, a2)` with `a0 = 1`.
    pub fn coefficients(&self) -> (f32, f32, f32, f32, f32) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }

    /// Processes a single sample through the biquad filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
                                     - self.a1 * self.y1 - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the filter state (delay lines).
    ///
    /// Useful for resetting the filter without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Response of the input conditioning filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Input passes unchanged.
    Bypass,
    /// Resonant 2-pole lowpass.
    #[default]
    Lowpass,
    /// Resonant 2-pole highpass.
    Highpass,
}

/// Resonant input conditioning filter with coefficient smoothing.
///
/// Cutoff and resonance are *requested* through the setters and *applied* by
/// [`update_coefficients`](Self::update_coefficients). After the first design,
/// each update moves the applied cutoff by at most a factor of
/// [`CUTOFF_SMOOTHING`] and the resonance by at most
/// [`RESONANCE_SMOOTHING_DB`]; repeated updates walk towards the request.
/// When request and applied values already agree, the update returns
/// without any trigonometry.
///
/// # Example
///
/// ```rust
/// use rtverb_core::{FilterMode, InputFilter};
///
/// let mut filter = InputFilter::new(FilterMode::Lowpass, 48000.0);
/// filter.set_params(8000.0, 0.5);
/// assert_eq!(filter.applied_cutoff(), 8000.0);
///
/// // Large jumps are rate-limited.
/// filter.set_cutoff(500.0);
/// assert!((filter.applied_cutoff() - 8000.0 / 1.2).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct InputFilter {
    biquad: Biquad,
    mode: FilterMode,
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    first: bool,
    last_cutoff: f32,
    last_resonance: f32,
}

impl InputFilter {
    /// Create a filter with the default request (1 kHz, 0 dB).
    pub fn new(mode: FilterMode, sample_rate: f32) -> Self {
        let mut filter = Self {
            biquad: Biquad::new(),
            mode,
            sample_rate,
            cutoff: 1000.0,
            resonance: 0.0,
            first: true,
            last_cutoff: 0.0,
            last_resonance: 0.0,
        };
        filter.update_coefficients();
        filter
    }

    /// Switch mode and sample rate.
    ///
    /// Clears the history and restarts smoothing, so the next design uses the
    /// requested values as given.
    pub fn reset(&mut self, mode: FilterMode, sample_rate: f32) {
        self.mode = mode;
        self.sample_rate = sample_rate;
        self.biquad.clear();
        self.first = true;
        self.last_cutoff = 0.0;
        self.last_resonance = 0.0;
        #[cfg(feature = "tracing")]
        tracing::debug!("input_filter: reset to {mode:?} at {sample_rate} Hz");
        self.update_coefficients();
    }

    /// Request a cutoff frequency in Hz (floored at [`MIN_CUTOFF_HZ`]).
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff = cutoff_hz.max(MIN_CUTOFF_HZ);
        self.update_coefficients();
    }

    /// Request a resonance in dB.
    pub fn set_resonance(&mut self, resonance_db: f32) {
        self.resonance = resonance_db;
        self.update_coefficients();
    }

    /// Request cutoff and resonance together with a single update.
    pub fn set_params(&mut self, cutoff_hz: f32, resonance_db: f32) {
        self.cutoff = cutoff_hz.max(MIN_CUTOFF_HZ);
        self.resonance = resonance_db;
        self.update_coefficients();
    }

    /// Move the applied parameters towards the request and redesign.
    pub fn update_coefficients(&mut self) {
        if self.mode == FilterMode::Bypass {
            self.biquad.set_passthrough();
            return;
        }

        let mut cutoff = self.cutoff;
        let mut resonance = self.resonance;

        if self.first {
            self.first = false;
        } else if cutoff == self.last_cutoff && resonance == self.last_resonance {
            return;
        } else {
            cutoff = cutoff.clamp(
                self.last_cutoff / CUTOFF_SMOOTHING,
                self.last_cutoff * CUTOFF_SMOOTHING,
            );
            resonance = resonance.clamp(
                self.last_resonance - RESONANCE_SMOOTHING_DB,
                self.last_resonance + RESONANCE_SMOOTHING_DB,
            );
        }

        self.last_cutoff = cutoff;
        self.last_resonance = resonance;

        let norm_cutoff = (cutoff / self.sample_rate).min(MAX_NORMALIZED_CUTOFF);

        let k = tanf(PI * norm_cutoff);
        let kk = k * k;
        let q = db_to_factor(resonance);
        let div = 1.0 / (1.0 + (k + 1.0 / q) * k);

        let a1 = 2.0 * (kk - 1.0) * div;
        let a2 = (1.0 - k / q + kk) * div;

        match self.mode {
            FilterMode::Lowpass => {
                let b0 = kk * div;
                self.biquad.set_coefficients(b0, 2.0 * b0, b0, 1.0, a1, a2);
            }
            FilterMode::Highpass => {
                self.biquad.set_coefficients(div, -2.0 * div, div, 1.0, a1, a2);
            }
            FilterMode::Bypass => self.biquad.set_passthrough(),
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.mode == FilterMode::Bypass {
            return input;
        }
        self.biquad.process(input)
    }

    /// Clear the sample history, keeping the coefficients.
    pub fn clear(&mut self) {
        self.biquad.clear();
    }

    /// Current filter mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Requested cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Requested resonance in dB.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Cutoff the current coefficients were designed for.
    pub fn applied_cutoff(&self) -> f32 {
        self.last_cutoff
    }

    /// Resonance the current coefficients were designed for.
    pub fn applied_resonance(&self) -> f32 {
        self.last_resonance
    }

    /// `true` once the applied values match the request.
    pub fn is_settled(&self) -> bool {
        self.mode == FilterMode::Bypass
            || (self.last_cutoff == self.cutoff && self.last_resonance == self.resonance)
    }

    /// The underlying biquad section.
    pub fn biquad(&self) -> &Biquad {
        &self.biquad
    }
}
