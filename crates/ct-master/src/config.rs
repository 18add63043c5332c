//! Engine configuration loaded from TOML.

use std::path::Path;

use ct_engine::MAX_CHANNELS;
use ct_ir::InstrumentParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Playback settings.
///
/// Every field is optional in the file; missing fields take the defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub bpm: f32,
    /// Clock subdivision of a tempo beat
    pub beat_unit: f32,
    pub master_volume: f32,
    pub channels: u8,
    /// Replaces the demo instruments, in order
    pub instruments: Vec<InstrumentParams>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            bpm: 120.0,
            beat_unit: 1.0,
            master_volume: 0.8,
            channels: 4,
            instruments: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid("sample_rate must be positive".into()));
        }
        if !positive(self.bpm) {
            return Err(ConfigError::Invalid(format!("bpm must be positive, got {}", self.bpm)));
        }
        if !positive(self.beat_unit) {
            return Err(ConfigError::Invalid(format!(
                "beat_unit must be positive, got {}",
                self.beat_unit
            )));
        }
        if !self.master_volume.is_finite() || self.master_volume < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "master_volume must not be negative, got {}",
                self.master_volume
            )));
        }
        if self.channels == 0 || self.channels as usize > MAX_CHANNELS {
            return Err(ConfigError::Invalid(format!(
                "channels must be 1..={MAX_CHANNELS}, got {}",
                self.channels
            )));
        }
        Ok(())
    }
}

fn positive(x: f32) -> bool {
    x.is_finite() && x > 0.0
}
