//! Serial rangefinder transport.
//!
//! Opens the port 8N1 with an explicit read timeout and assembles
//! newline-delimited ASCII frames out of arbitrarily fragmented reads.
use crate::error::{HwError, Result};
use proximo_traits::{BoxError, RangeSensor};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::Read;
use std::time::Duration;

/// Accumulates raw bytes and yields complete lines.
///
/// Frames are split on `\n`; a trailing `\r` is stripped so both LF and CRLF
/// sensors work. Bytes that are not valid UTF-8 yield a lossy string; the
/// parser downstream rejects anything that is not a number.
///
/// A stream that never terminates a line (misconfigured sensor, stuck
/// line) is discarded once `pending` exceeds [`MAX_PENDING_BYTES`]; a valid
/// frame is at most a handful of characters.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
}

/// Upper bound on buffered bytes awaiting a line terminator.
pub const MAX_PENDING_BYTES: usize = 512;

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; call `next_line` until it returns None.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        if self.pending.len() > MAX_PENDING_BYTES && !self.pending.contains(&b'\n') {
            tracing::warn!(
                buffered = self.pending.len(),
                "no line terminator seen, discarding buffered bytes"
            );
            self.pending.clear();
        }
    }

    /// Pop the next complete line, if one has fully arrived.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.pending.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
        line.pop(); // the '\n'
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Ultrasonic rangefinder on a serial port emitting one reading per line.
pub struct SerialRangeSensor {
    port: Box<dyn SerialPort>,
    assembler: LineAssembler,
    read_buf: [u8; 256],
}

impl SerialRangeSensor {
    /// Open a serial port for the rangefinder.
    ///
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyUSB0")
    /// * `baud` - Baud rate (e.g., 9600)
    /// * `read_timeout` - Per-read blocking cap
    pub fn open(path: &str, baud: u32, read_timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(read_timeout)
            .open()?;
        tracing::info!(path, baud, "opened rangefinder serial port");
        Ok(Self {
            port,
            assembler: LineAssembler::new(),
            read_buf: [0u8; 256],
        })
    }
}

impl RangeSensor for SerialRangeSensor {
    fn read_line(&mut self, _timeout: Duration) -> std::result::Result<Option<String>, BoxError> {
        // A buffered line may already be complete from a previous read.
        if let Some(line) = self.assembler.next_line() {
            return Ok(Some(line));
        }
        // Only block when the port reports pending bytes; the port's own
        // timeout bounds the read when the report races the data.
        let available = self.port.bytes_to_read().map_err(HwError::Serial)?;
        if available == 0 {
            return Ok(None);
        }
        match self.port.read(&mut self.read_buf) {
            Ok(0) => Ok(None),
            Ok(n) => {
                self.assembler.feed(&self.read_buf[..n]);
                Ok(self.assembler.next_line())
            }
            // Bytes were reported available yet the read timed out: the
            // port is misbehaving, not merely idle.
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(Box::new(HwError::Timeout)),
            Err(e) => Err(Box::new(HwError::Io(e))),
        }
    }
}
