//! Test and helper mocks for proximo_core

use proximo_traits::{AudioSink, BoxError, RangeSensor};
use std::time::Duration;

/// A sensor that always errors on read; useful when driving the engine
/// by publishing into the shared cell directly.
pub struct NoopSensor;

impl RangeSensor for NoopSensor {
    fn read_line(&mut self, _timeout: Duration) -> Result<Option<String>, BoxError> {
        Err(Box::new(std::io::Error::other("noop sensor")))
    }
}

/// A sensor that replays a fixed script of lines, then reports no data.
pub struct ScriptedSensor {
    lines: Vec<String>,
    idx: usize,
}

impl ScriptedSensor {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            idx: 0,
        }
    }
}

impl RangeSensor for ScriptedSensor {
    fn read_line(&mut self, _timeout: Duration) -> Result<Option<String>, BoxError> {
        let line = self.lines.get(self.idx).cloned();
        if line.is_some() {
            self.idx += 1;
        }
        Ok(line)
    }
}

/// An audio sink that accepts everything silently.
#[derive(Default)]
pub struct NoopAudio;

impl AudioSink for NoopAudio {
    fn play_looped(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
    fn set_volume(&mut self, _volume: f32) -> Result<(), BoxError> {
        Ok(())
    }
}
