//! rtverb Core - DSP primitives for a real-time Freeverb-style reverb
//!
//! This crate provides the building blocks of the reverb engine, designed for
//! real-time audio processing with zero allocation in the audio path. Every
//! buffer is sized once at construction; processing only reads and writes
//! inside that storage.
//!
//! # Building Blocks
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Fixed-capacity circular buffer with an adjustable active length
//! - [`PredelayLine`] - Predelay whose length changes abruptly
//! - [`CrossfadePredelay`] - Predelay that blends old and new lengths over 20 ms
//!
//! ## Reverb Filters
//!
//! - [`CombFilter`] - Feedback comb with one-pole damping in the loop
//! - [`AllpassFilter`] - Schroeder allpass for diffusion
//!
//! ## Input Conditioning
//!
//! - [`Biquad`] - Direct Form I second-order section
//! - [`InputFilter`] - Resonant lowpass/highpass with rate-limited coefficient updates
//!
//! ## Utilities
//!
//! - Math functions: [`flush_denormal`], [`db_to_factor`], [`stereo_wet_gains`], [`crossfade`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! rtverb-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use rtverb_core::{AllpassFilter, CombFilter};
//!
//! let mut comb = CombFilter::new(1116);
//! comb.set_feedback(0.84);
//! comb.set_damp(0.2);
//! let mut diffuser = AllpassFilter::new(556);
//!
//! let mut out = 0.0;
//! for i in 0..2048 {
//!     let x = if i == 0 { 1.0 } else { 0.0 };
//!     out = diffuser.process(comb.process(x));
//! }
//! assert!(out.is_finite());
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod comb;
pub mod delay;
pub mod math;
pub mod predelay;

// Re-export main types at crate root
pub use allpass::{ALLPASS_FEEDBACK, AllpassFilter};
pub use biquad::{
    Biquad, CUTOFF_SMOOTHING, FilterMode, InputFilter, MAX_NORMALIZED_CUTOFF, MIN_CUTOFF_HZ,
    RESONANCE_SMOOTHING_DB,
};
pub use comb::CombFilter;
pub use delay::DelayLine;
pub use math::{DB_TO_EXP2, crossfade, db_to_factor, flush_denormal, stereo_wet_gains};
pub use predelay::{CrossfadePredelay, FADE_SECONDS, PredelayLine, seconds_to_samples};
