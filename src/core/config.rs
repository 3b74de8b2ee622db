//! Configuration system: TOML file + smart defaults.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, RoverError};

/// Full rover-console configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub paths: PathsConfig,
    pub timing: TimingConfig,
    pub alarm: AlarmConfig,
}

/// Filesystem paths used by the console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory searched for screen template files before falling back to
    /// the built-in templates.
    pub template_dir: PathBuf,
    /// Flat `key:value` operator settings file.
    pub settings_file: PathBuf,
    /// Append-only JSONL activity log.
    pub jsonl_log: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("config"),
            settings_file: PathBuf::from("config/rover.settings"),
            jsonl_log: PathBuf::from("rover-activity.jsonl"),
        }
    }
}

/// Loop cadence knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    /// Sleep between alarm-monitor ticks. Bounds CPU during the armed loop.
    pub tick_interval_ms: u64,
    /// Wall-clock interval between alarm phase flips.
    pub phase_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            phase_interval_ms: 500,
        }
    }
}

/// Defaults applied to a fresh alarm configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlarmConfig {
    /// Monitoring duration in `duration_unit` units.
    pub duration: u32,
    /// One of `seconds`, `minutes`, `hours`.
    pub duration_unit: String,
    /// One of `light`, `light_left`, `light_right`, `temperature_f`,
    /// `temperature_c`.
    pub sensor: String,
    /// Suppress a triggered message already present in the output log.
    pub suppress_repeat_messages: bool,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            duration: 5,
            duration_unit: "minutes".to_string(),
            sensor: "temperature_f".to_string(),
            suppress_repeat_messages: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| RoverError::io(path, e))?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    /// Parse failures still surface — a present-but-broken config should not
    /// be silently replaced.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize the configuration back to TOML text.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| RoverError::Serialization {
            context: "toml",
            details: e.to_string(),
        })
    }

    /// Write the configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_toml()?).map_err(|e| RoverError::io(path, e))
    }
}
