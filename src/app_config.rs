use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::file_utils::FileManager;

/// Engine configuration module
/// This module handles loading, validating and saving the settings that tune
/// lookup, parsing and burn-in styling.
/// Represents the engine configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Active-entry lookup settings
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Interchange text parsing settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Burn-in style settings
    #[serde(default)]
    pub burn_in: BurnInConfig,

    /// External service settings
    #[serde(default)]
    pub collaborators: CollaboratorConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Active-entry lookup configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LookupConfig {
    // @field: Seconds a caption stays active after its end
    #[serde(default)]
    pub grace_window_secs: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            grace_window_secs: 0.0,
        }
    }
}

/// Parser configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParserConfig {
    // @field: Fail on unparsable timestamps instead of falling back to 0
    #[serde(default)]
    pub strict_timecodes: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_timecodes: false,
        }
    }
}

/// Burn-in style configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BurnInConfig {
    // @field: Font family name passed to the transcoder
    #[serde(default = "default_font_name")]
    pub font_name: String,

    // @field: Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    // @field: Bottom margin in pixels when a caption has no position
    #[serde(default = "default_margin_v")]
    pub default_margin_v: u32,
}

impl Default for BurnInConfig {
    fn default() -> Self {
        Self {
            font_name: default_font_name(),
            font_size: default_font_size(),
            default_margin_v: default_margin_v(),
        }
    }
}

/// External collaborator configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CollaboratorConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate's level filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

fn default_font_name() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    24
}

fn default_margin_v() -> u32 {
    30
}

fn default_timeout_secs() -> u64 {
    120
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        FileManager::write_to_file(path, &json)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let grace = self.lookup.grace_window_secs;
        if !grace.is_finite() || grace < 0.0 {
            return Err(anyhow!("Grace window must be a non-negative number, got {}", grace));
        }

        if self.burn_in.font_name.trim().is_empty() {
            return Err(anyhow!("Burn-in font name must not be empty"));
        }

        if self.burn_in.font_size == 0 {
            return Err(anyhow!("Burn-in font size must be greater than zero"));
        }

        if self.collaborators.timeout_secs == 0 {
            return Err(anyhow!("Collaborator timeout must be greater than zero"));
        }

        Ok(())
    }
}
