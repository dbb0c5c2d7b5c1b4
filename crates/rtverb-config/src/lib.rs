//! Configuration and preset management for rtverb.
//!
//! Everything that comes from outside the program lives here: preset files,
//! the factory preset catalog, engine configuration files and the checks
//! applied to them before they reach the real-time engine.
//!
//! # Features
//!
//! - **Preset files**: Load and save [`PresetFile`]s as TOML
//! - **Factory presets**: Eight built-in rooms, halls and a freeze
//! - **Engine files**: Describe sample rate, network size and optional stages
//! - **Validation**: Range checks with every problem reported at once
//! - **Paths**: Per-user preset directory
//!
//! # Example
//!
//! ```rust,no_run
//! use rtverb_config::{EngineFile, PresetFile, build_engine, paths};
//!
//! let mut engine = build_engine(&EngineFile::load("rtverb.toml")?)?;
//!
//! // Hand a user preset to the audio thread
//! if let Some(path) = paths::find_preset("dark_plate") {
//!     engine.queue_preset(&PresetFile::load(path)?.to_preset()?);
//! }
//! # Ok::<(), rtverb_config::ConfigError>(())
//! ```

mod engine_file;
mod error;
mod preset_file;
mod tuning;

/// Platform-specific preset locations.
pub mod paths;

/// Parameter validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use engine_file::{EngineFile, InputFilterSetting, PredelaySetting, build_engine};
pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_catalog, factory_preset, factory_presets, is_factory_preset,
};
pub use preset_file::{ParameterTable, PresetFile, load_preset};
pub use tuning::{MAX_COMBS, TuningTable, freeverb_tuning};
pub use validation::{
    PARAMETER_RANGES, ParamRange, ValidationError, ValidationResult, param_range,
    validate_parameters, validate_predelay,
};
