//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use rtverb_engine::{Preset, ReverbParameters};

use crate::error::ConfigError;
use crate::validation::validate_parameters;

/// Parameter values as stored in a preset file.
///
/// Missing keys take their [`ReverbParameters::DEFAULT`] value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterTable {
    /// Room size, 0.0 to 1.0.
    pub room_size: f32,
    /// Damping, 0.0 to 1.0.
    pub damp: f32,
    /// Wet level, 0.0 to 1.0.
    pub wet: f32,
    /// Dry level, 0.0 to 1.0.
    pub dry: f32,
    /// Stereo width, 0.0 to 1.0.
    pub width: f32,
    /// 0.0 normal, 1.0 freeze.
    pub mode: f32,
    /// Predelay in seconds.
    pub predelay: f32,
    /// Input filter cutoff in Hz.
    pub cutoff: f32,
    /// Input filter resonance in dB.
    pub resonance: f32,
}

impl Default for ParameterTable {
    fn default() -> Self {
        ReverbParameters::DEFAULT.into()
    }
}

impl From<ReverbParameters> for ParameterTable {
    fn from(p: ReverbParameters) -> Self {
        Self {
            room_size: p.room_size,
            damp: p.damp,
            wet: p.wet,
            dry: p.dry,
            width: p.width,
            mode: p.mode,
            predelay: p.predelay,
            cutoff: p.cutoff,
            resonance: p.resonance,
        }
    }
}

impl From<ParameterTable> for ReverbParameters {
    fn from(t: ParameterTable) -> Self {
        Self {
            room_size: t.room_size,
            damp: t.damp,
            wet: t.wet,
            dry: t.dry,
            width: t.width,
            mode: t.mode,
            predelay: t.predelay,
            cutoff: t.cutoff,
            resonance: t.resonance,
        }
    }
}

/// Preset file format.
///
/// # TOML Format
///
/// ```toml
/// name = "Medium Hall"
/// description = "Concert hall with a short gap before the tail"
///
/// [parameters]
/// room_size = 0.6
/// damp = 0.4
/// predelay = 0.015
/// cutoff = 8000.0
/// resonance = 0.4
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresetFile {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parameter values.
    #[serde(default)]
    pub parameters: ParameterTable,
}

impl PresetFile {
    /// Create a preset file with the given name and parameters.
    pub fn new(name: impl Into<String>, parameters: ReverbParameters) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: parameters.into(),
        }
    }

    /// Create a preset file with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Load a preset file from disk. Values are not validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let file = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %file.name, "loaded preset file");
        Ok(file)
    }

    /// Parse a preset file from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved preset file");
        Ok(())
    }

    /// Convert to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parameter values of this file.
    pub fn parameters(&self) -> ReverbParameters {
        self.parameters.into()
    }

    /// Check every parameter against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(validate_parameters(&self.parameters())?)
    }

    /// Validate and convert into an engine preset.
    pub fn to_preset(&self) -> Result<Preset, ConfigError> {
        self.validate()?;
        Ok(Preset::named(self.name.clone(), self.parameters()))
    }

    /// Snapshot an engine preset.
    pub fn from_preset(preset: &Preset) -> Self {
        Self::new(preset.name.as_ref(), preset.parameters)
    }
}

/// Load, validate and convert a preset file in one step.
pub fn load_preset(path: impl AsRef<Path>) -> Result<Preset, ConfigError> {
    let path = path.as_ref();
    let file = PresetFile::load(path)?;
    file.to_preset().inspect_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "rejected preset file");
    })
}
