use crate::defaults;
use crate::error::{ClipscribeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub stt: SttConfig,
}

/// Audio processing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Target sample rate processed clips are resampled to.
    pub sample_rate: u32,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    /// Whisper model size tag (e.g. "medium", "small").
    pub model: String,
    /// Active language set: CJE, CJ or C.
    pub languages: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            languages: defaults::DEFAULT_LANGUAGE_SET.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error; only a missing file falls back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ClipscribeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - CLIPSCRIBE_MODEL → stt.model
    /// - CLIPSCRIBE_LANGUAGES → stt.languages
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("CLIPSCRIBE_MODEL")
            && !model.is_empty()
        {
            self.stt.model = model;
        }

        if let Ok(languages) = std::env::var("CLIPSCRIBE_LANGUAGES")
            && !languages.is_empty()
        {
            self.stt.languages = languages;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/clipscribe/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("clipscribe")
            .join("config.toml")
    }

    #[cfg(not(feature = "cli"))]
    pub fn default_path() -> PathBuf {
        PathBuf::from(".config").join("clipscribe").join("config.toml")
    }
}
