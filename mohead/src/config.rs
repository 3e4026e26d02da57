//! Configuration for mohead
//!
//! Loaded from a TOML file. Every section falls back to defaults, so a file
//! only needs the keys it overrides; command-line flags are applied on top.

use crate::error::{Error, Result};
use crate::protocol::{DEFAULT_PAYLOAD_LEN, MAX_PAYLOAD_LEN};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub serial: SerialConfig,
    pub protocol: ProtocolConfig,
    pub server: ServerConfig,
    pub calibration: CalibrationConfig,
    pub logging: LoggingConfig,
}

/// Sensor serial link
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Serial device path (e.g. Bluetooth SPP bridge or USB-UART)
    pub device: String,
    pub baud: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: "/dev/tty.HC-06-DevB".to_string(),
            baud: 115_200,
        }
    }
}

/// Frame layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Payload bytes between TYPE and CHECKSUM
    pub payload_len: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            payload_len: DEFAULT_PAYLOAD_LEN,
        }
    }
}

/// NDJSON consumer endpoint
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP bind address
    ///
    /// Examples:
    /// - `127.0.0.1:6770` - Localhost only
    /// - `0.0.0.0:6770` - All interfaces
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:6770".to_string(),
        }
    }
}

/// Timings of the `--setup` calibration script, in seconds
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Pause after reset, frame selection, calibration exit and speed mode
    pub settle_secs: u64,
    /// Countdown before accelerometer calibration starts
    pub accel_countdown_secs: u64,
    /// How long the accelerometer calibrates
    pub accel_duration_secs: u64,
    /// Countdown before magnetometer calibration starts
    pub mag_countdown_secs: u64,
    /// How long the magnetometer calibrates while the device is rotated
    pub mag_duration_secs: u64,
}

impl CalibrationConfig {
    /// All timings zero; used by tests
    pub fn immediate() -> Self {
        Self {
            settle_secs: 0,
            accel_countdown_secs: 0,
            accel_duration_secs: 0,
            mag_countdown_secs: 0,
            mag_duration_secs: 0,
        }
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            settle_secs: 1,
            accel_countdown_secs: 5,
            accel_duration_secs: 5,
            mag_countdown_secs: 5,
            mag_duration_secs: 20,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter (trace, debug, info, warn, error); `RUST_LOG` wins
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from a TOML file
    ///
    /// # Example
    /// ```no_run
    /// use mohead::config::AppConfig;
    ///
    /// let config = AppConfig::from_file("mohead.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the decoder or serial layer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.serial.device.is_empty() {
            return Err(Error::Config("serial.device must not be empty".to_string()));
        }
        if self.serial.baud == 0 {
            return Err(Error::Config("serial.baud must be non-zero".to_string()));
        }
        if self.protocol.payload_len == 0 || self.protocol.payload_len > MAX_PAYLOAD_LEN {
            return Err(Error::Config(format!(
                "protocol.payload_len must be in 1..={}, got {}",
                MAX_PAYLOAD_LEN, self.protocol.payload_len
            )));
        }
        if self.server.bind.is_empty() {
            return Err(Error::Config("server.bind must not be empty".to_string()));
        }
        Ok(())
    }
}
