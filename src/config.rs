use std::{error::Error, fmt, fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::sysex::SystemMode;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "Failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {e}"),
            ConfigError::Invalid(reason) => write!(f, "Invalid config: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_port: Option<String>,
    pub input_port: Option<String>,
    pub throttle_ms: u64,
    pub tick_hz: u32,
    pub device_ids: Vec<u8>,
    pub mode: SystemMode,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_hz == 0 {
            return Err(ConfigError::Invalid("tick_hz must be positive".into()));
        }
        if self.device_ids.is_empty() {
            return Err(ConfigError::Invalid("device_ids is empty".into()));
        }
        if let Some(id) = self.device_ids.iter().find(|id| **id > 0x7F) {
            return Err(ConfigError::Invalid(format!(
                "device id {id:#04X} does not fit in 7 bits"
            )));
        }
        Ok(())
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_port: None,
            input_port: None,
            throttle_ms: 30,
            tick_hz: 60,
            device_ids: (0x10..=0x1F).collect(),
            mode: SystemMode::Patch,
        }
    }
}
