#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the proximity feedback system.
//!
//! `Config` and sub-structs are deserialized from TOML and validated.
//! Every section has full defaults so a missing file or empty table still
//! yields a runnable configuration.
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(&'static str),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Serial link to the rangefinder.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerialCfg {
    /// Port path, e.g. "/dev/ttyUSB0" or "COM3".
    pub port: String,
    pub baud: u32,
    /// Per-read timeout (ms). Hard-capped at 500 ms during validation.
    pub read_timeout_ms: u64,
    /// Sleep between polling iterations of the reader thread (ms).
    pub poll_ms: u64,
}

impl Default for SerialCfg {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".into(),
            baud: 9600,
            read_timeout_ms: 500,
            poll_ms: 100,
        }
    }
}

/// Median filter over incoming distance samples.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterCfg {
    /// Sliding window size for the median (samples).
    pub window: usize,
}

impl Default for FilterCfg {
    fn default() -> Self {
        Self { window: 5 }
    }
}

/// Tick cadence of the feedback engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineCfg {
    /// Milliseconds between orchestrator ticks.
    pub tick_ms: u64,
}

impl Default for EngineCfg {
    fn default() -> Self {
        Self { tick_ms: 33 }
    }
}

/// Thermal regulation knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThermalCfg {
    /// No corrective write while |sensed - target| <= deadband (°C).
    pub deadband_c: f32,
    /// Assumed device temperature when the sensor reports nothing (°C).
    pub fallback_temp_c: f32,
}

impl Default for ThermalCfg {
    fn default() -> Self {
        Self {
            deadband_c: 0.5,
            fallback_temp_c: 27.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub serial: SerialCfg,
    pub filter: FilterCfg,
    pub engine: EngineCfg,
    pub thermal: ThermalCfg,
    pub logging: Logging,
}

/// Per-read timeout ceiling (ms); a single read attempt never blocks longer.
pub const READ_TIMEOUT_CAP_MS: u64 = 500;

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate and normalize. The read timeout is clamped to the cap rather
    /// than rejected, matching the transport's own ceiling.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.serial.port.is_empty() {
            return Err(ConfigError::Invalid("serial.port must not be empty"));
        }
        if self.serial.baud == 0 {
            return Err(ConfigError::Invalid("serial.baud must be > 0"));
        }
        if self.serial.read_timeout_ms == 0 {
            return Err(ConfigError::Invalid("serial.read_timeout_ms must be >= 1"));
        }
        if self.serial.poll_ms == 0 {
            return Err(ConfigError::Invalid("serial.poll_ms must be >= 1"));
        }
        if self.filter.window == 0 {
            return Err(ConfigError::Invalid("filter.window must be >= 1"));
        }
        if self.engine.tick_ms == 0 {
            return Err(ConfigError::Invalid("engine.tick_ms must be >= 1"));
        }
        if !self.thermal.deadband_c.is_finite() || self.thermal.deadband_c < 0.0 {
            return Err(ConfigError::Invalid("thermal.deadband_c must be >= 0"));
        }
        if !self.thermal.fallback_temp_c.is_finite() {
            return Err(ConfigError::Invalid("thermal.fallback_temp_c must be finite"));
        }
        self.serial.read_timeout_ms = self.serial.read_timeout_ms.min(READ_TIMEOUT_CAP_MS);
        Ok(())
    }
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist.
pub fn load_config(path: &std::path::Path) -> eyre::Result<Config> {
    if !path.exists() {
        let mut cfg = Config::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    Ok(Config::from_toml_str(&text)?)
}
