//! Diffusion allpass.
//!
//! Four of these in series per channel smear the comb bank's echoes into a
//! dense tail.

use crate::DelayLine;
use crate::flush_denormal;

/// Loop gain of every diffusion allpass.
pub const ALLPASS_FEEDBACK: f32 = 0.5;

/// Freeverb-style allpass with a fixed [`ALLPASS_FEEDBACK`].
///
/// ```text
/// b = line[cursor]
/// y = b − x
/// line[cursor] = x + b·0.5
/// ```
///
/// The response is only approximately flat; the loop is what matters for
/// diffusion.
///
/// # Example
///
/// ```rust
/// use rtverb_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(500);
/// assert_eq!(allpass.process(1.0), -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    line: DelayLine,
}

impl AllpassFilter {
    /// Allpass with a `length`-sample loop.
    ///
    /// # Panics
    ///
    /// Panics if `length` is 0.
    pub fn new(length: usize) -> Self {
        Self {
            line: DelayLine::new(length),
        }
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let buffered = self.line.current();
        self.line
            .write_advance(flush_denormal(input + buffered * ALLPASS_FEEDBACK));
        buffered - input
    }

    /// Zero the loop.
    pub fn mute(&mut self) {
        self.line.clear();
    }

    /// Loop length in samples.
    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    /// Delay line contents in storage order.
    pub fn buffer(&self) -> &[f32] {
        self.line.as_slice()
    }
}
