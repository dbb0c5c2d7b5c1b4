//! Predelay lines placed between the input filter and the comb bank.
//!
//! [`PredelayLine`] changes length abruptly: the history is discarded and the
//! output is silent until the new delay has filled. [`CrossfadePredelay`]
//! instead prepares the new length on a second, pre-allocated line and blends
//! from the old to the new output over [`FADE_SECONDS`].

use core::mem;

use libm::roundf;

use crate::{DelayLine, crossfade};

/// Duration of a predelay length crossfade.
pub const FADE_SECONDS: f32 = 0.02;

/// Convert a duration to a whole number of samples, `round(seconds · sr)`.
#[inline]
pub fn seconds_to_samples(seconds: f32, sample_rate: f32) -> usize {
    let samples = roundf(seconds * sample_rate);
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// Predelay with abrupt length changes.
///
/// # Example
///
/// ```rust
/// use rtverb_core::PredelayLine;
///
/// let mut predelay = PredelayLine::new(64);
/// assert_eq!(predelay.process(0.5), 0.5); // length 0 = passthrough
///
/// predelay.set_len(2);
/// assert_eq!(predelay.process(1.0), 0.0);
/// assert_eq!(predelay.process(0.0), 0.0);
/// assert_eq!(predelay.process(0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct PredelayLine {
    line: DelayLine,
}

impl PredelayLine {
    /// Create a passthrough predelay able to hold `max_samples`.
    ///
    /// # Panics
    ///
    /// Panics if `max_samples` is 0.
    pub fn new(max_samples: usize) -> Self {
        Self {
            line: DelayLine::with_capacity(max_samples),
        }
    }

    /// Set the delay in samples, clamped to the capacity.
    ///
    /// Clears the stored history. Returns the applied length.
    pub fn set_len(&mut self, samples: usize) -> usize {
        self.line.set_len(samples)
    }

    /// Active delay in samples.
    pub fn len(&self) -> usize {
        self.line.len()
    }

    /// Returns `true` when the predelay passes its input through.
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Maximum delay in samples.
    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    /// Delay one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.line.tick(input)
    }

    /// Zero the stored history.
    pub fn clear(&mut self) {
        self.line.clear();
    }
}

/// Predelay that crossfades between the old and new length.
///
/// Two lines of equal capacity are allocated up front. A length change seeds
/// the idle line with the most recent history of the active one and then, for
/// `round(FADE_SECONDS · sample_rate)` samples, feeds both and outputs
/// `old · f + new · (1 − f)` with `f` falling from 1 towards 0. When the fade
/// completes the two lines trade places; no allocation or copy takes place.
///
/// A new length requested mid-fade restarts the fade from the active line.
///
/// # Example
///
/// ```rust
/// use rtverb_core::CrossfadePredelay;
///
/// let mut predelay = CrossfadePredelay::new(4800, 48000.0);
/// assert_eq!(predelay.fade_len(), 960);
///
/// predelay.set_len(480);
/// assert!(predelay.is_fading());
/// for _ in 0..960 {
///     predelay.process(0.0);
/// }
/// assert!(!predelay.is_fading());
/// assert_eq!(predelay.len(), 480);
/// ```
#[derive(Debug, Clone)]
pub struct CrossfadePredelay {
    active: DelayLine,
    shadow: DelayLine,
    target: usize,
    fade_len: usize,
    fade_remaining: usize,
}

impl CrossfadePredelay {
    /// Create a passthrough predelay able to hold `max_samples`.
    ///
    /// # Panics
    ///
    /// Panics if `max_samples` is 0.
    pub fn new(max_samples: usize, sample_rate: f32) -> Self {
        Self {
            active: DelayLine::with_capacity(max_samples),
            shadow: DelayLine::with_capacity(max_samples),
            target: 0,
            fade_len: seconds_to_samples(FADE_SECONDS, sample_rate),
            fade_remaining: 0,
        }
    }

    /// Recompute the fade window for a new sample rate.
    ///
    /// A fade in progress is completed immediately.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.fade_len = seconds_to_samples(FADE_SECONDS, sample_rate);
        #[cfg(feature = "tracing")]
        tracing::debug!("predelay: crossfade window {} samples", self.fade_len);
        if self.fade_remaining > 0 {
            self.finish_fade();
        }
    }

    /// Request a new delay in samples, clamped to the capacity.
    ///
    /// Returns the applied target length.
    pub fn set_len(&mut self, samples: usize) -> usize {
        let samples = samples.min(self.active.capacity());
        if samples == self.target {
            return self.target;
        }

        self.target = self.shadow.seed_from(&self.active, samples);

        if self.fade_len == 0 {
            self.finish_fade();
        } else {
            self.fade_remaining = self.fade_len;
        }
        self.target
    }

    /// Delay one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.fade_remaining == 0 {
            return self.active.tick(input);
        }

        let old = self.active.tick(input);
        let new = self.shadow.tick(input);
        let fade = self.fade_remaining as f32 / self.fade_len as f32;
        let out = crossfade(old, new, fade);

        self.fade_remaining -= 1;
        if self.fade_remaining == 0 {
            self.finish_fade();
        }
        out
    }

    /// Zero both lines and cancel any fade, keeping the target length.
    pub fn clear(&mut self) {
        if self.fade_remaining > 0 {
            self.finish_fade();
        }
        self.active.clear();
        self.shadow.clear();
    }

    /// Delay of the line currently in charge of the output.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns `true` when the active line passes its input through.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Length the predelay is settling on.
    pub fn target_len(&self) -> usize {
        self.target
    }

    /// Maximum delay in samples.
    pub fn capacity(&self) -> usize {
        self.active.capacity()
    }

    /// Crossfade window in samples.
    pub fn fade_len(&self) -> usize {
        self.fade_len
    }

    /// Returns `true` while blending between two lengths.
    pub fn is_fading(&self) -> bool {
        self.fade_remaining > 0
    }

    fn finish_fade(&mut self) {
        mem::swap(&mut self.active, &mut self.shadow);
        self.fade_remaining = 0;
    }
}
