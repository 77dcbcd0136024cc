use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum FeedbackError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("device write failed: {0}")]
    DeviceWrite(String),
    #[error("audio error: {0}")]
    Audio(String),
    #[error("no actuator devices available")]
    MissingActuators,
}

/// Per-frame parse outcome for a single serial line. Recovered by dropping
/// the sample; surfaced as a typed error for tests and the fuzz target.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("malformed frame {0:?}")]
    Malformed(String),
    #[error("distance {0} cm outside [0, 200]")]
    OutOfRange(f32),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing audio sink")]
    MissingAudio,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

/// Map a sensor-side error to a typed FeedbackError, with special handling
/// for hardware errors.
pub(crate) fn map_sensor_error(e: &(dyn std::error::Error + 'static)) -> FeedbackError {
    #[cfg(feature = "hardware-errors")]
    if let Some(hw) = e.downcast_ref::<proximo_hardware::HwError>() {
        return match hw {
            proximo_hardware::HwError::Timeout => FeedbackError::Connection("sensor timeout".into()),
            other => FeedbackError::Connection(other.to_string()),
        };
    }
    FeedbackError::Connection(e.to_string())
}
