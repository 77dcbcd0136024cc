//! Fixed-cadence driver for the feedback engine.
//!
//! The host normally calls `Feedback::tick` from its own per-frame
//! scheduler; this module provides a self-contained loop for binaries that
//! have no such scheduler, pacing ticks with a crossbeam ticker and
//! stopping on a shutdown channel.
use crate::{Feedback, TickStatus};
use crossbeam_channel as xch;
use std::time::Duration;

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub transitions: u64,
}

impl RunSummary {
    /// Fold one tick outcome into the counters.
    #[inline]
    fn record(&mut self, status: TickStatus) {
        self.ticks += 1;
        if matches!(status, TickStatus::Transition(_)) {
            self.transitions += 1;
        }
    }
}

/// Clamp a configured tick period to something the ticker can sustain.
#[inline]
fn effective_period(tick_ms: u64) -> Duration {
    Duration::from_millis(tick_ms.max(1))
}

/// Run the engine until the shutdown channel fires (or disconnects),
/// ticking at the configured cadence. Calls `start()` once before the
/// first tick.
pub fn run(feedback: &mut Feedback, tick_ms: u64, shutdown: &xch::Receiver<()>) -> RunSummary {
    let period = effective_period(tick_ms);
    let ticker = xch::tick(period);
    let mut summary = RunSummary::default();

    feedback.start();
    tracing::info!(tick_ms = period.as_millis() as u64, "feedback loop start");

    loop {
        xch::select! {
            recv(ticker) -> _ => {
                let status = feedback.tick();
                summary.record(status);
                if let TickStatus::Transition(band) = status {
                    tracing::debug!(?band, ticks = summary.ticks, "transition applied");
                }
            }
            recv(shutdown) -> _ => {
                // Fires on both an explicit signal and a dropped sender.
                break;
            }
        }
    }

    tracing::info!(
        ticks = summary.ticks,
        transitions = summary.transitions,
        "feedback loop stopped"
    );
    summary
}
