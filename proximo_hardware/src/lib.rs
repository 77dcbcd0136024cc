pub mod error;
pub mod serial;

pub use error::HwError;
pub use serial::{LineAssembler, SerialRangeSensor};

use proximo_traits::{AudioSink, BoxError, HapticDevice, LedMode, RangeSensor, ThermalMode, VibrationMode};
use std::time::Duration;

/// Simulated actuator device for development without hardware.
///
/// Staged fields are committed on `write`; the sensed temperature drifts
/// toward the thermal drive a little on every committed write so the
/// bang-bang regulator sees plausible feedback.
#[derive(Debug, Default)]
pub struct SimulatedDevice {
    vibration: (f32, f32),
    rgb: [u8; 3],
    thermal: f32,
    temp_c: f32,
    writes: u64,
}

impl SimulatedDevice {
    pub fn new(start_temp_c: f32) -> Self {
        Self {
            temp_c: start_temp_c,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl HapticDevice for SimulatedDevice {
    fn set_vibration(&mut self, _mode: VibrationMode, intensity: f32, frequency_hz: f32) {
        self.vibration = (intensity, frequency_hz);
    }

    fn set_led(&mut self, _mode: LedMode, rgb: [u8; 3]) {
        self.rgb = rgb;
    }

    fn set_thermal(&mut self, _mode: ThermalMode, intensity: f32) {
        self.thermal = intensity;
    }

    fn sensed_temperature(&mut self) -> Option<f32> {
        Some(self.temp_c)
    }

    fn write(&mut self) -> Result<(), BoxError> {
        self.writes += 1;
        self.temp_c += 0.1 * self.thermal;
        tracing::debug!(
            intensity = self.vibration.0,
            hz = self.vibration.1,
            rgb = ?self.rgb,
            thermal = self.thermal,
            temp_c = self.temp_c,
            "simulated device write"
        );
        Ok(())
    }
}

/// Simulated audio handle that only logs volume changes.
#[derive(Debug, Default)]
pub struct SimulatedAudio {
    volume: f32,
    playing: bool,
}

impl AudioSink for SimulatedAudio {
    fn play_looped(&mut self) -> Result<(), BoxError> {
        self.playing = true;
        tracing::info!("simulated audio: looped playback started");
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), BoxError> {
        self.volume = volume;
        tracing::debug!(volume, "simulated audio volume");
        Ok(())
    }
}

/// Simulated rangefinder that sweeps between two distances, emitting one
/// ASCII line per poll the way the real sensor does.
#[derive(Debug)]
pub struct SweepRangeSensor {
    current_cm: f32,
    step_cm: f32,
    min_cm: f32,
    max_cm: f32,
}

impl SweepRangeSensor {
    pub fn new(min_cm: f32, max_cm: f32, step_cm: f32) -> Self {
        Self {
            current_cm: max_cm,
            step_cm: -step_cm.abs(),
            min_cm,
            max_cm,
        }
    }
}

impl Default for SweepRangeSensor {
    fn default() -> Self {
        Self::new(5.0, 150.0, 2.0)
    }
}

impl RangeSensor for SweepRangeSensor {
    fn read_line(&mut self, _timeout: Duration) -> Result<Option<String>, BoxError> {
        self.current_cm += self.step_cm;
        if self.current_cm <= self.min_cm || self.current_cm >= self.max_cm {
            self.step_cm = -self.step_cm;
            self.current_cm = self.current_cm.clamp(self.min_cm, self.max_cm);
        }
        Ok(Some(format!("{:.1}", self.current_cm)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_stays_in_bounds_and_reverses() {
        let mut s = SweepRangeSensor::new(10.0, 20.0, 4.0);
        let mut seen = Vec::new();
        for _ in 0..20 {
            let line = s.read_line(Duration::from_millis(1)).unwrap().unwrap();
            let v: f32 = line.parse().unwrap();
            assert!((10.0..=20.0).contains(&v), "out of bounds: {v}");
            seen.push(v);
        }
        // Must both descend and ascend over enough polls.
        assert!(seen.windows(2).any(|w| w[1] < w[0]));
        assert!(seen.windows(2).any(|w| w[1] > w[0]));
    }

    #[test]
    fn simulated_device_drifts_toward_thermal_drive() {
        let mut d = SimulatedDevice::new(27.0);
        d.set_thermal(ThermalMode::Manual, 1.0);
        for _ in 0..5 {
            d.write().unwrap();
        }
        assert!(d.sensed_temperature().unwrap() > 27.0);
        assert_eq!(d.writes(), 5);
    }
}
