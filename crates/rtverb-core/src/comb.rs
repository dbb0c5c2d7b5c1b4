//! Damped feedback comb, the decay stage of the reverb.
//!
//! Each comb recirculates its input through a delay line whose output is
//! smoothed by a one-pole lowpass before being fed back. The parallel bank of
//! combs in the engine produces the bulk of the reverb tail; the lowpass makes
//! high frequencies die away faster than low ones.

use crate::DelayLine;
use crate::flush_denormal;

/// Feedback comb filter with a damping lowpass in the loop.
///
/// ```text
/// input ─→ (+) ─→ [delay N] ─┬─→ output
///           ↑                │
///           └─ feedback · LP(damp) ←┘
/// ```
///
/// Per sample:
///
/// ```text
/// y      = line[cursor]
/// store  = y·(1 − damp) + store·damp
/// line[cursor] = x + store·feedback
/// ```
///
/// # Example
///
/// ```rust
/// use rtverb_core::CombFilter;
///
/// let mut comb = CombFilter::new(3);
/// comb.set_feedback(0.5);
/// comb.set_damp(0.0);
///
/// let out: Vec<f32> = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
///     .iter()
///     .map(|&x| comb.process(x))
///     .collect();
/// assert_eq!(out, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5]);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    line: DelayLine,
    feedback: f32,
    damp: f32,
    store: f32,
}

impl CombFilter {
    /// Comb with an `length`-sample loop, feedback 0.5 and damping 0.5.
    ///
    /// # Panics
    ///
    /// Panics if `length` is 0.
    pub fn new(length: usize) -> Self {
        Self {
            line: DelayLine::new(length),
            feedback: 0.5,
            damp: 0.5,
            store: 0.0,
        }
    }

    /// Loop gain, clamped to `[0, 1]`. 1.0 never decays (freeze).
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 1.0);
    }

    /// Current loop gain.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Lowpass coefficient in the loop, clamped to `[0, 1]` (0 = bright).
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Current damping.
    #[inline]
    pub fn damp(&self) -> f32 {
        self.damp
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.line.current();
        self.store = flush_denormal(output * (1.0 - self.damp) + self.store * self.damp);
        self.line.write_advance(input + self.store * self.feedback);
        output
    }

    /// Zero the loop and the lowpass state.
    pub fn mute(&mut self) {
        self.line.clear();
        self.store = 0.0;
    }

    /// Loop length in samples.
    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    /// Lowpass state.
    pub fn filter_store(&self) -> f32 {
        self.store
    }

    /// Delay line contents in storage order.
    pub fn buffer(&self) -> &[f32] {
        self.line.as_slice()
    }
}
