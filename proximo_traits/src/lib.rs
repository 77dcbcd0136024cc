pub mod clock;

pub use clock::{Clock, MonotonicClock};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Line-oriented distance sensor (e.g. an ultrasonic rangefinder on a
/// serial link emitting one ASCII reading per line).
///
/// `read_line` returns `Ok(Some(line))` when a complete frame arrived within
/// `timeout`, `Ok(None)` when no data was available, and `Err` on transport
/// failure. The caller owns parsing and validation.
pub trait RangeSensor {
    fn read_line(&mut self, timeout: std::time::Duration) -> Result<Option<String>, BoxError>;
}

/// Vibration drive mode of an actuator device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VibrationMode {
    Off,
    Manual,
}

/// LED drive mode of an actuator device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    Off,
    /// One color applied to every LED on the device.
    GlobalManual,
}

/// Thermal drive mode of an actuator device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalMode {
    Off,
    Manual,
}

/// One addressable haptic device: settable vibration, LED, and thermal
/// fields plus a readable sensed temperature. Setters stage values on the
/// driver side; `write` commits the staged state to the device and is the
/// only call that can fail.
pub trait HapticDevice {
    fn set_vibration(&mut self, mode: VibrationMode, intensity: f32, frequency_hz: f32);
    fn set_led(&mut self, mode: LedMode, rgb: [u8; 3]);
    fn set_thermal(&mut self, mode: ThermalMode, intensity: f32);
    /// Last sensed device temperature in °C, if the device reports one.
    fn sensed_temperature(&mut self) -> Option<f32>;
    fn write(&mut self) -> Result<(), BoxError>;
}

/// Volume-controllable playback handle for the proximity audio cue.
pub trait AudioSink {
    /// Enable looped playback and start playing.
    fn play_looped(&mut self) -> Result<(), BoxError>;
    /// Set playback volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32) -> Result<(), BoxError>;
}

impl<T: RangeSensor + ?Sized> RangeSensor for Box<T> {
    fn read_line(&mut self, timeout: std::time::Duration) -> Result<Option<String>, BoxError> {
        (**self).read_line(timeout)
    }
}

impl<T: HapticDevice + ?Sized> HapticDevice for Box<T> {
    fn set_vibration(&mut self, mode: VibrationMode, intensity: f32, frequency_hz: f32) {
        (**self).set_vibration(mode, intensity, frequency_hz);
    }
    fn set_led(&mut self, mode: LedMode, rgb: [u8; 3]) {
        (**self).set_led(mode, rgb);
    }
    fn set_thermal(&mut self, mode: ThermalMode, intensity: f32) {
        (**self).set_thermal(mode, intensity);
    }
    fn sensed_temperature(&mut self) -> Option<f32> {
        (**self).sensed_temperature()
    }
    fn write(&mut self) -> Result<(), BoxError> {
        (**self).write()
    }
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn play_looped(&mut self) -> Result<(), BoxError> {
        (**self).play_looped()
    }
    fn set_volume(&mut self, volume: f32) -> Result<(), BoxError> {
        (**self).set_volume(volume)
    }
}
