//! Fixed-capacity circular delay line.
//!
//! Every delay-based stage of the reverb (comb, allpass, predelay) is built on
//! [`DelayLine`]. The storage is allocated once at construction and never
//! resized; only the *active length* changes, and only within the capacity.
//!
//! # Read-then-write
//!
//! A line of active length `N` has a single cursor. The sample at the cursor is
//! the one written `N` ticks ago, so reading it before overwriting it yields an
//! exact `N`-sample delay without a separate read pointer:
//!
//! ```text
//!   tick(x):  y = buf[cursor]; buf[cursor] = x; cursor = (cursor + 1) % N
//! ```
//!
//! An active length of 0 turns the line into a passthrough, which is how the
//! predelay expresses "no delay" without a branch in the caller.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Circular delay buffer with a fixed capacity and an adjustable active length.
///
/// # Invariants
///
/// - `buffer.len()` (the capacity) never changes after construction
/// - `len <= capacity`
/// - `cursor < len` whenever `len > 0`, otherwise `cursor == 0`
///
/// # Example
///
/// ```rust
/// use rtverb_core::DelayLine;
///
/// let mut line = DelayLine::new(4);
/// assert_eq!(line.tick(1.0), 0.0);
/// for _ in 0..3 {
///     line.tick(0.0);
/// }
/// assert_eq!(line.tick(0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    len: usize,
    cursor: usize,
}

impl DelayLine {
    /// Creates a line whose active length equals its capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Delay capacity must be > 0");

        Self {
            buffer: vec![0.0; capacity],
            len: capacity,
            cursor: 0,
        }
    }

    /// Creates a line with the given capacity and an initial active length of 0
    /// (passthrough).
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut line = Self::new(capacity);
        line.len = 0;
        line
    }

    /// Total storage in samples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Active delay length in samples (0 = passthrough).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the line passes its input straight through.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cursor position.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sample under the cursor, i.e. the one written `len` ticks ago.
    #[inline]
    pub fn current(&self) -> f32 {
        if self.len == 0 { 0.0 } else { self.buffer[self.cursor] }
    }

    /// Overwrites the sample under the cursor and advances the cursor.
    #[inline]
    pub fn write_advance(&mut self, sample: f32) {
        if self.len == 0 {
            return;
        }
        self.buffer[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor >= self.len {
            self.cursor = 0;
        }
    }

    /// Reads the delayed sample, then stores `sample` in its place.
    #[inline]
    pub fn tick(&mut self, sample: f32) -> f32 {
        if self.len == 0 {
            return sample;
        }
        let out = self.buffer[self.cursor];
        self.write_advance(sample);
        out
    }

    /// The sample written `age` ticks ago (`1` = most recent).
    ///
    /// Returns 0.0 for ages beyond the active length.
    #[inline]
    pub fn history(&self, age: usize) -> f32 {
        if age == 0 || age > self.len {
            return 0.0;
        }
        self.buffer[(self.cursor + self.len - age) % self.len]
    }

    /// Changes the active length, clamped to the capacity.
    ///
    /// The whole buffer is cleared and the cursor returns to 0. Returns the
    /// length actually applied.
    pub fn set_len(&mut self, len: usize) -> usize {
        self.len = len.min(self.capacity());
        self.clear();
        self.len
    }

    /// Rebuilds this line with active length `len`, filled with the most recent
    /// history of `source`.
    ///
    /// Positions for which `source` holds no history are zeroed, so the line
    /// never replays stale samples. Returns the length actually applied.
    pub fn seed_from(&mut self, source: &DelayLine, len: usize) -> usize {
        self.len = len.min(self.capacity());
        self.cursor = 0;
        for i in 0..self.len {
            self.buffer[i] = source.history(self.len - i);
        }
        self.buffer[self.len..].fill(0.0);
        self.len
    }

    /// Zeroes the storage and resets the cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.cursor = 0;
    }

    /// Raw view of the storage, for state inspection.
    pub fn as_slice(&self) -> &[f32] {
        &self.buffer
    }
}
