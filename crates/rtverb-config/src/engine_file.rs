//! Engine configuration files.
//!
//! An engine file fixes everything decided at construction: sample rate,
//! network size, optional stages and the initial preset.
//!
//! ```toml
//! sample_rate = 44100
//! combs = 8
//! input_filter = "highpass"
//! predelay = "crossfade"
//! max_predelay_samples = 8820
//! preset = "Medium Hall"
//! ```
//!
//! A `[tuning]` table (see [`TuningTable`]) replaces the Freeverb tuning
//! selected by `combs`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use rtverb_engine::{
    DEFAULT_MAX_PREDELAY_SAMPLES, DEFAULT_NUM_COMBS, DEFAULT_SAMPLE_RATE, EngineConfig,
    FilterMode, PredelayMode, ReverbEngine,
};

use crate::error::ConfigError;
use crate::factory_presets::{factory_catalog, factory_preset};
use crate::preset_file::load_preset;
use crate::tuning::{TuningTable, freeverb_tuning};

/// Input filter stage as written in an engine file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputFilterSetting {
    /// No filter stage.
    Off,
    /// Stage present but passing the signal unchanged.
    Bypass,
    /// Low-pass input filter.
    #[default]
    Lowpass,
    /// High-pass input filter.
    Highpass,
}

impl InputFilterSetting {
    /// Filter mode handed to the engine, `None` for no stage.
    pub fn filter_mode(self) -> Option<FilterMode> {
        match self {
            Self::Off => None,
            Self::Bypass => Some(FilterMode::Bypass),
            Self::Lowpass => Some(FilterMode::Lowpass),
            Self::Highpass => Some(FilterMode::Highpass),
        }
    }
}

/// Predelay stage as written in an engine file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PredelaySetting {
    /// No predelay stage.
    #[default]
    Off,
    /// Length changes take effect at once.
    Simple,
    /// Length changes are crossfaded over 20 ms.
    Crossfade,
}

impl From<PredelaySetting> for PredelayMode {
    fn from(setting: PredelaySetting) -> Self {
        match setting {
            PredelaySetting::Off => Self::Off,
            PredelaySetting::Simple => Self::Simple,
            PredelaySetting::Crossfade => Self::Crossfade,
        }
    }
}

fn default_sample_rate() -> f32 {
    DEFAULT_SAMPLE_RATE
}

fn default_combs() -> usize {
    DEFAULT_NUM_COMBS
}

fn default_max_predelay_samples() -> usize {
    DEFAULT_MAX_PREDELAY_SAMPLES
}

/// Engine configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineFile {
    /// Sample rate in Hz (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f32,

    /// Freeverb combs per channel, 1 to 8 (defaults to 4).
    #[serde(default = "default_combs")]
    pub combs: usize,

    /// Input filter stage.
    #[serde(default)]
    pub input_filter: InputFilterSetting,

    /// Predelay stage.
    #[serde(default)]
    pub predelay: PredelaySetting,

    /// Predelay capacity in samples.
    #[serde(default = "default_max_predelay_samples")]
    pub max_predelay_samples: usize,

    /// Initial preset: a factory preset name or a path to a preset file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Explicit buffer lengths, replacing the Freeverb tuning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning: Option<TuningTable>,
}

impl Default for EngineFile {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            combs: DEFAULT_NUM_COMBS,
            input_filter: InputFilterSetting::default(),
            predelay: PredelaySetting::default(),
            max_predelay_samples: DEFAULT_MAX_PREDELAY_SAMPLES,
            preset: None,
            tuning: None,
        }
    }
}

impl EngineFile {
    /// Load an engine file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let file = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded engine file");
        Ok(file)
    }

    /// Parse an engine file from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the engine file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Convert to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Engine configuration described by this file, validated.
    pub fn to_config(&self) -> Result<EngineConfig, ConfigError> {
        let tuning = match &self.tuning {
            Some(table) => table.clone().into(),
            None => freeverb_tuning(self.combs, self.sample_rate)?,
        };
        let config = EngineConfig::new(self.sample_rate)
            .with_tuning(tuning)
            .with_input_filter(self.input_filter.filter_mode())
            .with_predelay(self.predelay.into())
            .with_max_predelay_samples(self.max_predelay_samples);
        config.validate()?;
        Ok(config)
    }
}

/// Build an engine from an engine file.
///
/// The factory presets become the engine's catalog. The initial preset, if
/// any, is looked up among the factory presets first and otherwise loaded
/// from disk.
///
/// # Example
///
/// ```rust
/// use rtverb_config::{EngineFile, build_engine};
///
/// let file = EngineFile::from_toml(r#"
/// combs = 8
/// predelay = "simple"
/// preset = "Medium Hall"
/// "#)?;
/// let engine = build_engine(&file)?;
/// assert_eq!(engine.num_combs(), 8);
/// assert_eq!(engine.latency_samples(), 720);
/// assert_eq!(engine.catalog().len(), 8);
/// # Ok::<(), rtverb_config::ConfigError>(())
/// ```
pub fn build_engine(file: &EngineFile) -> Result<ReverbEngine, ConfigError> {
    let mut engine = ReverbEngine::with_config(file.to_config()?)?;
    engine.set_catalog(factory_catalog());

    if let Some(name) = &file.preset {
        let preset = match factory_preset(name) {
            Some(preset) => preset,
            None if Path::new(name).is_file() => load_preset(name)?,
            None => return Err(ConfigError::PresetNotFound(name.clone())),
        };
        engine.apply_preset(&preset);
    }

    tracing::info!(
        sample_rate = file.sample_rate,
        combs = engine.num_combs(),
        input_filter = ?file.input_filter,
        predelay = ?file.predelay,
        preset = file.preset.as_deref().unwrap_or("Default"),
        "reverb engine built"
    );
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtverb_engine::EngineError;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(EngineFile::from_toml("").unwrap(), EngineFile::default());
    }

    #[test]
    fn test_default_matches_engine_default() {
        let engine = build_engine(&EngineFile::default()).unwrap();
        let reference = ReverbEngine::new(DEFAULT_SAMPLE_RATE);
        assert_eq!(engine.num_combs(), reference.num_combs());
        assert_eq!(engine.input_filter_mode(), reference.input_filter_mode());
        assert_eq!(engine.predelay_mode(), reference.predelay_mode());
        assert_eq!(engine.parameters(), reference.parameters());
    }

    #[test]
    fn test_settings_parse_lowercase() {
        let file = EngineFile::from_toml(
            r#"
input_filter = "off"
predelay = "crossfade"
"#,
        )
        .unwrap();
        assert_eq!(file.input_filter.filter_mode(), None);
        assert_eq!(PredelayMode::from(file.predelay), PredelayMode::Crossfade);
    }

    #[test]
    fn test_unknown_setting_rejected() {
        assert!(EngineFile::from_toml("predelay = \"tape\"").is_err());
        assert!(EngineFile::from_toml("comb = 4").is_err());
    }

    #[test]
    fn test_bad_comb_count() {
        let file = EngineFile {
            combs: 12,
            ..EngineFile::default()
        };
        assert!(matches!(
            file.to_config(),
            Err(ConfigError::InvalidCombCount(12))
        ));
    }

    #[test]
    fn test_tuning_table_overrides_combs() {
        let file = EngineFile::from_toml(
            r#"
combs = 8
[tuning]
comb_left = [101, 103]
comb_right = [107, 109]
allpass_left = [31]
allpass_right = [37]
"#,
        )
        .unwrap();
        let engine = build_engine(&file).unwrap();
        assert_eq!(engine.num_combs(), 2);
    }

    #[test]
    fn test_mismatched_tuning_is_engine_error() {
        let file = EngineFile {
            tuning: Some(TuningTable {
                comb_left: vec![101, 103],
                comb_right: vec![107],
                allpass_left: vec![],
                allpass_right: vec![],
            }),
            ..EngineFile::default()
        };
        assert!(matches!(
            file.to_config(),
            Err(ConfigError::Engine(EngineError::BankSizeMismatch { .. }))
        ));
    }

    #[test]
    fn test_unknown_preset() {
        let file = EngineFile {
            preset: Some("Hangar".to_string()),
            ..EngineFile::default()
        };
        assert!(matches!(
            build_engine(&file),
            Err(ConfigError::PresetNotFound(name)) if name == "Hangar"
        ));
    }

    #[test]
    fn test_factory_preset_applied() {
        let file = EngineFile {
            preset: Some("freeze".to_string()),
            ..EngineFile::default()
        };
        let engine = build_engine(&file).unwrap();
        assert!(engine.is_frozen());
    }
}
