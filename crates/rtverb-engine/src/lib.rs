//! rtverb Engine - real-time stereo Freeverb
//!
//! This crate assembles the rtverb-core primitives into a complete stereo
//! reverb:
//!
//! - [`ReverbEngine`] - Comb bank, allpass chain, optional input filter and predelay
//! - [`EngineConfig`] / [`Tuning`] - Construction-time shape of the network
//! - [`ReverbParameters`] / [`Preset`] - User-facing parameter snapshots
//! - [`ParameterController`] - Clamping and coefficient derivation (normal/freeze)
//! - [`PresetQueue`] - Lock-free preset handoff from a control thread
//!
//! ## Example
//!
//! ```rust
//! use rtverb_engine::{EngineConfig, PredelayMode, Preset, ReverbEngine, ReverbParameters};
//!
//! let config = EngineConfig::new(48000.0).with_predelay(PredelayMode::Crossfade);
//! let mut engine = ReverbEngine::with_config(config)?;
//!
//! let hall = Preset::new("Hall", ReverbParameters {
//!     room_size: 0.8,
//!     predelay: 0.02,
//!     ..ReverbParameters::DEFAULT
//! });
//! engine.queue_preset(&hall);
//!
//! let input = vec![0.0f32; 1024];
//! let mut out_l = vec![0.0f32; 1024];
//! let mut out_r = vec![0.0f32; 1024];
//! engine.process(&input, &input, &mut out_l, &mut out_r, 1024, 1);
//! assert_eq!(engine.latency_samples(), 960);
//! # Ok::<(), rtverb_engine::EngineError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod mailbox;
pub mod params;

// Re-export main types at crate root
pub use config::{
    ALLPASS_TUNINGS_44K, COMB_TUNINGS_44K, DEFAULT_MAX_PREDELAY_SAMPLES, DEFAULT_NUM_COMBS,
    DEFAULT_SAMPLE_RATE, EngineConfig, PredelayMode, REFERENCE_RATE, STEREO_SPREAD, Tuning,
};
pub use controller::{Coefficients, ParameterController};
pub use engine::{DEFAULT_CATALOG, ReverbEngine};
pub use error::{Channel, EngineError};
pub use mailbox::{PresetMailbox, PresetQueue};
pub use params::{
    FIXED_GAIN, FREEZE_GAIN, FREEZE_THRESHOLD, MAX_FEEDBACK, Preset, ReverbMode,
    ReverbParameters,
};

pub use rtverb_core::FilterMode;
