//! Actuation controller behavior: write debouncing, temperature deadband,
//! and cache semantics on write failure.
use proximo_core::bands::RangeBand;
use proximo_core::reader::SharedDistance;
use proximo_core::{ThermalCfg, TickStatus, build_feedback};
use proximo_traits::{AudioSink, BoxError, HapticDevice, LedMode, ThermalMode, VibrationMode};
use std::sync::{Arc, Mutex};

// Device spy that records staged values and counts committed writes.
#[derive(Default, Clone)]
struct SpyDevice {
    state: Arc<Mutex<SpyState>>,
}

#[derive(Default)]
struct SpyState {
    writes: u64,
    fail_writes: bool,
    vibration: Option<(f32, f32)>,
    color: Option<[u8; 3]>,
    thermal: Option<f32>,
    sensed_temp: Option<f32>,
}

impl SpyDevice {
    fn with_temperature(temp_c: f32) -> Self {
        let spy = Self::default();
        spy.state.lock().unwrap().sensed_temp = Some(temp_c);
        spy
    }

    fn writes(&self) -> u64 {
        self.state.lock().unwrap().writes
    }

    fn set_failing(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    fn vibration(&self) -> Option<(f32, f32)> {
        self.state.lock().unwrap().vibration
    }

    fn color(&self) -> Option<[u8; 3]> {
        self.state.lock().unwrap().color
    }

    fn thermal(&self) -> Option<f32> {
        self.state.lock().unwrap().thermal
    }
}

impl HapticDevice for SpyDevice {
    fn set_vibration(&mut self, _mode: VibrationMode, intensity: f32, frequency_hz: f32) {
        self.state.lock().unwrap().vibration = Some((intensity, frequency_hz));
    }
    fn set_led(&mut self, _mode: LedMode, rgb: [u8; 3]) {
        self.state.lock().unwrap().color = Some(rgb);
    }
    fn set_thermal(&mut self, _mode: ThermalMode, intensity: f32) {
        self.state.lock().unwrap().thermal = Some(intensity);
    }
    fn sensed_temperature(&mut self) -> Option<f32> {
        self.state.lock().unwrap().sensed_temp
    }
    fn write(&mut self) -> Result<(), BoxError> {
        let mut st = self.state.lock().unwrap();
        if st.fail_writes {
            return Err(Box::new(std::io::Error::other("spy write failure")));
        }
        st.writes += 1;
        Ok(())
    }
}

#[derive(Default)]
struct NoopAudio;
impl AudioSink for NoopAudio {
    fn play_looped(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
    fn set_volume(&mut self, _volume: f32) -> Result<(), BoxError> {
        Ok(())
    }
}

fn engine_with(
    spy: &SpyDevice,
    shared: &SharedDistance,
) -> proximo_core::FeedbackG<SpyDevice, NoopAudio> {
    build_feedback(
        vec![spy.clone()],
        NoopAudio,
        shared.clone(),
        ThermalCfg::default(),
    )
    .unwrap()
}

#[test]
fn repeated_band_issues_no_further_writes() {
    let shared = SharedDistance::new();
    // Sensed temperature at the Close band target keeps thermal quiet.
    let spy = SpyDevice::with_temperature(31.0);
    let mut engine = engine_with(&spy, &shared);

    shared.publish(10.0);
    assert_eq!(engine.tick(), TickStatus::Transition(RangeBand::Close));
    let after_first = spy.writes();
    // One vibration write plus one LED write.
    assert_eq!(after_first, 2);

    // Same band again: all writes debounced away.
    shared.publish(12.0);
    assert_eq!(engine.tick(), TickStatus::Steady(RangeBand::Close));
    assert_eq!(spy.writes(), after_first);
}

#[test]
fn band_change_rewrites_vibration_and_led() {
    let shared = SharedDistance::new();
    let spy = SpyDevice::with_temperature(27.0);
    let mut engine = build_feedback(
        vec![spy.clone()],
        NoopAudio,
        shared.clone(),
        ThermalCfg {
            // Wide deadband so only vibration/LED writes are counted.
            deadband_c: 100.0,
            ..ThermalCfg::default()
        },
    )
    .unwrap();

    shared.publish(10.0);
    engine.tick();
    assert_eq!(spy.writes(), 2);
    let close = RangeBand::Close.target();
    assert_eq!(
        spy.vibration(),
        Some((close.vibration_intensity, close.vibration_hz))
    );
    assert_eq!(spy.color(), Some([255, 0, 0]));

    shared.publish(60.0);
    assert_eq!(engine.tick(), TickStatus::Transition(RangeBand::Far));
    assert_eq!(spy.writes(), 4);
    let far = RangeBand::Far.target();
    assert_eq!(
        spy.vibration(),
        Some((far.vibration_intensity, far.vibration_hz))
    );
    assert_eq!(spy.color(), Some([0, 255, 0]));
}

#[test]
fn temperature_within_deadband_writes_nothing() {
    let shared = SharedDistance::new();
    // Close band target is 31.0; sensed 30.6 is within the 0.5 deadband.
    let spy = SpyDevice::with_temperature(30.6);
    let mut engine = engine_with(&spy, &shared);

    shared.publish(5.0);
    engine.tick();
    // Only the vibration and LED writes; no thermal write.
    assert_eq!(spy.writes(), 2);
    assert_eq!(spy.thermal(), None);
}

#[test]
fn temperature_outside_deadband_drives_toward_target() {
    let shared = SharedDistance::new();
    // Close target 31.0, sensed 27.0: heat.
    let spy = SpyDevice::with_temperature(27.0);
    let mut engine = engine_with(&spy, &shared);

    shared.publish(5.0);
    engine.tick();
    assert_eq!(spy.writes(), 3);
    assert_eq!(spy.thermal(), Some(1.0));

    // Direction unchanged on the next tick: debounced.
    engine.tick();
    assert_eq!(spy.writes(), 3);
}

#[test]
fn thermal_direction_reversal_is_written_once() {
    let shared = SharedDistance::new();
    // Sensed above every target: cool.
    let spy = SpyDevice::with_temperature(40.0);
    let mut engine = engine_with(&spy, &shared);

    shared.publish(5.0);
    engine.tick();
    assert_eq!(spy.thermal(), Some(-1.0));
    let writes = spy.writes();
    engine.tick();
    assert_eq!(spy.writes(), writes, "same direction must not rewrite");
}

#[test]
fn missing_sensed_temperature_uses_fallback() {
    let shared = SharedDistance::new();
    // No sensed temperature; fallback 27.0 vs Close target 31.0 -> heat.
    let spy = SpyDevice::default();
    let mut engine = engine_with(&spy, &shared);

    shared.publish(5.0);
    engine.tick();
    assert_eq!(spy.thermal(), Some(1.0));
}

#[test]
fn failed_write_is_retried_next_tick() {
    let shared = SharedDistance::new();
    let spy = SpyDevice::with_temperature(31.0);
    let mut engine = engine_with(&spy, &shared);

    spy.set_failing(true);
    shared.publish(10.0);
    engine.tick();
    // Both writes failed; cache must not advance.
    assert_eq!(spy.writes(), 0);

    spy.set_failing(false);
    engine.tick();
    // The unconditional re-apply converges the device.
    assert_eq!(spy.writes(), 2);
    let close = RangeBand::Close.target();
    assert_eq!(
        spy.vibration(),
        Some((close.vibration_intensity, close.vibration_hz))
    );
}

#[test]
fn empty_device_array_noops_but_ticks() {
    let shared = SharedDistance::new();
    let mut engine = build_feedback(
        Vec::<SpyDevice>::new(),
        NoopAudio,
        shared.clone(),
        ThermalCfg::default(),
    )
    .unwrap();

    shared.publish(30.0);
    assert_eq!(engine.tick(), TickStatus::Transition(RangeBand::Medium));
    assert_eq!(engine.device_count(), 0);
}

#[test]
fn all_devices_are_driven_in_lockstep() {
    let shared = SharedDistance::new();
    let a = SpyDevice::with_temperature(31.0);
    let b = SpyDevice::with_temperature(31.0);
    let mut engine = build_feedback(
        vec![a.clone(), b.clone()],
        NoopAudio,
        shared.clone(),
        ThermalCfg::default(),
    )
    .unwrap();

    shared.publish(10.0);
    engine.tick();
    assert_eq!(a.writes(), 2);
    assert_eq!(b.writes(), 2);
    assert_eq!(a.vibration(), b.vibration());
    assert_eq!(a.color(), b.color());
}
