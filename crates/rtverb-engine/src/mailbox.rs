//! Single-slot preset handoff between a control thread and the audio thread.
//!
//! The slot stores the nine parameter values as bit-cast `f32`s in atomics,
//! guarded by a sequence counter (a seqlock):
//!
//! - The writer claims the slot by moving the sequence from even to odd,
//!   stores the values, then publishes by moving it to the next even value.
//! - The reader loads the sequence, copies the values and checks the sequence
//!   again. An odd or changed sequence means the copy may be torn; the reader
//!   simply gives up and tries again on the next block.
//!
//! The reader never blocks and never observes a partial preset. A second
//! write before the reader runs replaces the first (last write wins).

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;
use core::hint::spin_loop;
use core::sync::atomic::{AtomicU32, Ordering, fence};

use crate::params::{Preset, ReverbParameters};

const FIELD_COUNT: usize = 9;

/// Sequence-locked slot holding at most one pending [`ReverbParameters`].
#[derive(Debug)]
pub struct PresetMailbox {
    sequence: AtomicU32,
    fields: [AtomicU32; FIELD_COUNT],
}

impl PresetMailbox {
    /// Empty mailbox.
    pub const fn new() -> Self {
        Self {
            sequence: AtomicU32::new(0),
            fields: [const { AtomicU32::new(0) }; FIELD_COUNT],
        }
    }

    /// Store `params`, replacing any value not yet taken.
    ///
    /// Concurrent writers are serialized by spinning on each other; the
    /// reader is never waited on.
    pub fn publish(&self, params: &ReverbParameters) {
        let mut seq = self.sequence.load(Ordering::Relaxed);
        loop {
            if seq & 1 == 1 {
                spin_loop();
                seq = self.sequence.load(Ordering::Relaxed);
                continue;
            }
            match self.sequence.compare_exchange_weak(
                seq,
                seq.wrapping_add(1),
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => seq = current,
            }
        }
        fence(Ordering::Release);

        for (slot, value) in self.fields.iter().zip(params.to_array()) {
            slot.store(value.to_bits(), Ordering::Relaxed);
        }

        self.sequence.store(seq.wrapping_add(2), Ordering::Release);
    }

    /// Take a published value newer than `last_seen`.
    ///
    /// Returns the value with its sequence number, or `None` when nothing new
    /// is available or a write is in progress. Never waits.
    pub fn try_take(&self, last_seen: u32) -> Option<(u32, ReverbParameters)> {
        let before = self.sequence.load(Ordering::Acquire);
        if before & 1 == 1 || before == last_seen {
            return None;
        }

        let values: [f32; FIELD_COUNT] =
            core::array::from_fn(|i| f32::from_bits(self.fields[i].load(Ordering::Relaxed)));

        fence(Ordering::Acquire);
        let after = self.sequence.load(Ordering::Relaxed);
        if after != before {
            return None;
        }

        Some((before, ReverbParameters::from_array(values)))
    }

    /// Returns `true` if a value newer than `last_seen` was published or is
    /// being written.
    pub fn has_pending(&self, last_seen: u32) -> bool {
        self.sequence.load(Ordering::Acquire) != last_seen
    }

    /// Current sequence number.
    pub fn sequence(&self) -> u32 {
        self.sequence.load(Ordering::Acquire)
    }
}

impl Default for PresetMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable producer handle for queueing presets from any thread.
///
/// Obtained from [`ReverbEngine::preset_queue`](crate::ReverbEngine::preset_queue).
///
/// # Example
///
/// ```rust
/// use rtverb_engine::{ReverbEngine, ReverbParameters};
///
/// let mut engine = ReverbEngine::new(48000.0);
/// let queue = engine.preset_queue();
///
/// std::thread::spawn(move || {
///     queue.queue_parameters(&ReverbParameters { room_size: 0.9, ..ReverbParameters::DEFAULT });
/// })
/// .join()
/// .unwrap();
///
/// let input = [0.0f32; 64];
/// let mut out_l = [0.0f32; 64];
/// let mut out_r = [0.0f32; 64];
/// engine.process(&input, &input, &mut out_l, &mut out_r, 64, 1);
/// assert_eq!(engine.room_size(), 0.9);
/// ```
#[derive(Debug, Clone)]
pub struct PresetQueue {
    mailbox: Arc<PresetMailbox>,
}

impl PresetQueue {
    pub(crate) fn new(mailbox: Arc<PresetMailbox>) -> Self {
        Self { mailbox }
    }

    /// Queue a preset for the next processing block.
    pub fn queue(&self, preset: &Preset) {
        self.mailbox.publish(&preset.parameters);
    }

    /// Queue raw parameter values for the next processing block.
    pub fn queue_parameters(&self, params: &ReverbParameters) {
        self.mailbox.publish(params);
    }
}
