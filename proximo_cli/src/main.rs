//! Binary entry point: wires config, logging, the serial reader thread and
//! the feedback engine together, then runs until Ctrl-C.

mod cli;

use clap::Parser;
use crossbeam_channel as xch;
use eyre::{Result, WrapErr};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, FILE_GUARD};
use proximo_core::error::FeedbackError;
use proximo_core::reader::{RangeReader, SharedDistance};
use proximo_core::{Feedback, runner};
use proximo_hardware::{SerialRangeSensor, SimulatedAudio, SimulatedDevice, SweepRangeSensor};
use proximo_traits::clock::MonotonicClock;

fn init_logging(args: &Cli, logging: &proximo_config::Logging) -> Result<()> {
    let level = args
        .log_level
        .as_deref()
        .or(logging.level.as_deref())
        .unwrap_or("info");
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let console: Box<dyn Layer<_> + Send + Sync> = if args.json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    let registry = tracing_subscriber::registry().with(filter).with(console);

    if let Some(path) = &logging.file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .wrap_err_with(|| format!("failed to open log file {path}"))?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        let _ = FILE_GUARD.set(guard);
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .init();
    } else {
        registry.init();
    }
    Ok(())
}

/// Open the configured sensor and start the background reader. A failed
/// serial open degrades to no sensing rather than aborting: the engine then
/// sees no distance and idles in the unspecified band.
fn start_reader(args: &Cli, cfg: &proximo_config::Config) -> (Option<RangeReader>, SharedDistance) {
    let read_timeout = Duration::from_millis(cfg.serial.read_timeout_ms);
    let poll = Duration::from_millis(cfg.serial.poll_ms);

    if args.sim {
        let sensor = SweepRangeSensor::default();
        let reader = RangeReader::spawn(
            sensor,
            read_timeout,
            poll,
            cfg.filter.window,
            MonotonicClock,
        );
        let shared = reader.shared();
        info!("simulated rangefinder sweep started");
        return (Some(reader), shared);
    }

    match SerialRangeSensor::open(&cfg.serial.port, cfg.serial.baud, read_timeout) {
        Ok(sensor) => {
            let reader = RangeReader::spawn(
                sensor,
                read_timeout,
                poll,
                cfg.filter.window,
                MonotonicClock,
            );
            let shared = reader.shared();
            info!(port = %cfg.serial.port, baud = cfg.serial.baud, "serial rangefinder open");
            (Some(reader), shared)
        }
        Err(e) => {
            warn!(
                error = %FeedbackError::Connection(e.to_string()),
                port = %cfg.serial.port,
                "running without a rangefinder"
            );
            (None, SharedDistance::new())
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    let mut cfg = proximo_config::load_config(&args.config)?;
    init_logging(&args, &cfg.logging)?;
    cli::apply_overrides(&mut cfg, &args);
    // Flag overrides are subject to the same checks as the file values.
    cfg.validate().wrap_err("invalid command-line override")?;
    info!(config = %args.config.display(), sim = args.sim, "proximo starting");

    let (tx, shutdown) = xch::bounded::<()>(1);
    {
        let tx = tx.clone();
        ctrlc::set_handler(move || {
            let _ = tx.try_send(());
        })
        .wrap_err("failed to install Ctrl-C handler")?;
    }
    if let Some(ms) = args.duration_ms {
        let tx = tx.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(ms));
            let _ = tx.try_send(());
        });
    }

    let (_reader, shared) = start_reader(&args, &cfg);

    let mut builder = Feedback::builder()
        .with_shared(shared)
        .with_thermal(cfg.thermal.clone().into());
    for _ in 0..args.devices {
        builder = builder.with_device(SimulatedDevice::new(cfg.thermal.fallback_temp_c));
    }
    let mut feedback = builder.with_audio(SimulatedAudio::default()).build()?;

    let summary = runner::run(&mut feedback, cfg.engine.tick_ms, &shutdown);

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "ticks": summary.ticks,
                "transitions": summary.transitions,
            })
        );
    } else {
        println!(
            "done: {} ticks, {} band transitions",
            summary.ticks, summary.transitions
        );
    }
    Ok(())
}
