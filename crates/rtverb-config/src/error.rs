//! Error types for configuration operations.

use std::path::PathBuf;

use rtverb_engine::EngineError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while loading, saving or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Preset not found in the factory catalog or on disk
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Freeverb tuning requested with an unsupported comb count
    #[error("comb count {0} out of range [1, 8]")]
    InvalidCombCount(usize),

    /// Sample rate is zero, negative or not finite
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),

    /// Parameter values failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The engine rejected the configuration
    #[error("engine configuration rejected: {0}")]
    Engine(#[from] EngineError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
