//! Background ingestion of rangefinder frames.
//!
//! Spawns a thread that owns the `RangeSensor`, parses and validates each
//! line, smooths valid samples through the median filter, and publishes the
//! latest filtered distance to a shared single-slot cell.
//!
//! Safety: Each `RangeReader` spawns exactly one thread that is
//! automatically shut down when the `RangeReader` is dropped, preventing
//! thread leaks.
use crate::error::{FrameError, map_sensor_error};
use crate::filter::MedianFilter;
use proximo_traits::RangeSensor;
use proximo_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

/// Valid distance domain in centimeters; samples outside are dropped before
/// they reach the filter.
pub const MIN_DISTANCE_CM: f32 = 0.0;
pub const MAX_DISTANCE_CM: f32 = 200.0;

/// Default sleep between reader iterations.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Single-slot cell for the latest filtered distance.
///
/// Single-writer (reader thread) / single-reader (orchestrator tick); the
/// f32 is stored as raw bits in an `AtomicU32`, NaN meaning "no data yet".
/// Relaxed ordering is sufficient for one scalar with this discipline.
#[derive(Debug, Clone)]
pub struct SharedDistance {
    bits: Arc<AtomicU32>,
}

impl SharedDistance {
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(f32::NAN.to_bits())),
        }
    }

    /// Overwrite the published distance in place.
    pub fn publish(&self, distance_cm: f32) {
        self.bits.store(distance_cm.to_bits(), Ordering::Relaxed);
    }

    /// Latest filtered distance, or None while no valid sample has arrived.
    pub fn get(&self) -> Option<f32> {
        let v = f32::from_bits(self.bits.load(Ordering::Relaxed));
        (v.is_finite() && v >= MIN_DISTANCE_CM).then_some(v)
    }
}

impl Default for SharedDistance {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one serial frame into a distance reading in centimeters.
pub fn parse_frame(line: &str) -> Result<f32, FrameError> {
    let trimmed = line.trim();
    let value: f32 = trimmed
        .parse()
        .map_err(|_| FrameError::Malformed(trimmed.to_string()))?;
    if !value.is_finite() || !(MIN_DISTANCE_CM..=MAX_DISTANCE_CM).contains(&value) {
        return Err(FrameError::OutOfRange(value));
    }
    Ok(value)
}

pub struct RangeReader {
    shared: SharedDistance,
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    /// Join handle for graceful thread cleanup
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl RangeReader {
    /// Spawn the ingestion thread. The sensor is owned by the thread; the
    /// returned handle only exposes the shared distance and shutdown.
    ///
    /// Frame handling per iteration: parse failures and out-of-domain values
    /// are dropped without updating the shared cell; transport errors are
    /// logged and the loop continues (the link is never torn down here).
    pub fn spawn<S, C>(
        mut sensor: S,
        read_timeout: Duration,
        poll_interval: Duration,
        filter_window: usize,
        clock: C,
    ) -> Self
    where
        S: RangeSensor + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let shared = SharedDistance::new();
        let shared_in = shared.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            let mut filter = MedianFilter::new(filter_window);
            loop {
                // Immediate shutdown check (lock-free atomic)
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("range reader thread received shutdown signal");
                    break;
                }

                match sensor.read_line(read_timeout) {
                    Ok(Some(line)) => match parse_frame(&line) {
                        Ok(sample) => {
                            let filtered = filter.push(sample);
                            shared_in.publish(filtered);
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "dropped frame");
                        }
                    },
                    Ok(None) => {}
                    Err(e) => {
                        // Non-fatal: the distance simply stops updating
                        // until the link recovers.
                        tracing::warn!(error = %map_sensor_error(&*e), "range read failed");
                    }
                }

                // Check shutdown before sleep to avoid unnecessary delay
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(poll_interval);
            }
            tracing::trace!("range reader thread exiting cleanly");
        });

        Self {
            shared,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Handle to the published distance for the orchestrator.
    pub fn shared(&self) -> SharedDistance {
        self.shared.clone()
    }

    /// Latest filtered distance, if any valid sample has arrived.
    pub fn latest(&self) -> Option<f32> {
        self.shared.get()
    }
}

impl Drop for RangeReader {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The thread exits immediately if it is between reads, or after the
        // current read completes (bounded by the sensor read timeout).
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("range reader thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "range reader thread panicked during shutdown");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_frames() {
        assert_eq!(parse_frame("42.5"), Ok(42.5));
        assert_eq!(parse_frame("  17\r"), Ok(17.0));
        assert_eq!(parse_frame("0"), Ok(0.0));
        assert_eq!(parse_frame("200"), Ok(200.0));
    }

    #[test]
    fn rejects_malformed_frames() {
        assert!(matches!(parse_frame(""), Err(FrameError::Malformed(_))));
        assert!(matches!(parse_frame("abc"), Err(FrameError::Malformed(_))));
        assert!(matches!(parse_frame("12.3.4"), Err(FrameError::Malformed(_))));
    }

    #[test]
    fn rejects_out_of_domain_frames() {
        assert!(matches!(parse_frame("-5"), Err(FrameError::OutOfRange(_))));
        assert!(matches!(parse_frame("250"), Err(FrameError::OutOfRange(_))));
        assert!(matches!(parse_frame("inf"), Err(FrameError::OutOfRange(_))));
        assert!(matches!(parse_frame("NaN"), Err(FrameError::OutOfRange(_))));
    }

    #[test]
    fn shared_cell_starts_unset_and_publishes() {
        let cell = SharedDistance::new();
        assert_eq!(cell.get(), None);
        cell.publish(33.0);
        assert_eq!(cell.get(), Some(33.0));
        // Overwritten in place, never accumulated.
        cell.publish(12.0);
        assert_eq!(cell.get(), Some(12.0));
    }

    #[test]
    fn clones_share_the_same_slot() {
        let a = SharedDistance::new();
        let b = a.clone();
        a.publish(7.0);
        assert_eq!(b.get(), Some(7.0));
    }
}
