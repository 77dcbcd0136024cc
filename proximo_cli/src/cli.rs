//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "proximo", version, about = "Proximity feedback vest driver")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/proximo.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); defaults to the
    /// config file's `logging.level`, then "info"
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Drive the engine from a simulated sweeping rangefinder instead of serial hardware
    #[arg(long, action = ArgAction::SetTrue)]
    pub sim: bool,

    /// Serial port path (takes precedence over config)
    #[arg(long, value_name = "PATH")]
    pub port: Option<String>,

    /// Serial baud rate (takes precedence over config)
    #[arg(long, value_name = "BAUD")]
    pub baud: Option<u32>,

    /// Engine tick period in ms (takes precedence over config)
    #[arg(long = "tick-ms", value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Number of vest devices to drive
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub devices: usize,

    /// Stop after this many milliseconds instead of waiting for Ctrl-C
    #[arg(long = "duration-ms", value_name = "MS")]
    pub duration_ms: Option<u64>,
}

/// Fold CLI overrides into the loaded config. CLI > file > defaults.
pub fn apply_overrides(cfg: &mut proximo_config::Config, cli: &Cli) {
    if let Some(port) = &cli.port {
        cfg.serial.port = port.clone();
    }
    if let Some(baud) = cli.baud {
        cfg.serial.baud = baud;
    }
    if let Some(tick_ms) = cli.tick_ms {
        cfg.engine.tick_ms = tick_ms;
    }
}
