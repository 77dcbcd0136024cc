#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core proximity feedback engine (hardware-agnostic).
//!
//! Converts filtered rangefinder distances into haptic, LED, thermal, and
//! audio feedback. All hardware interactions go through the
//! `proximo_traits::HapticDevice` and `proximo_traits::AudioSink` traits.
//!
//! ## Architecture
//!
//! - **Ingestion**: background serial reader + median filter (`reader`,
//!   `filter` modules), publishing into a shared single-slot cell
//! - **Classification**: distance → proximity band (`bands` module)
//! - **Actuation**: per-device debounced vibration/LED writes and bang-bang
//!   thermal regulation (`FeedbackCore`)
//! - **Audio**: per-band volume applied on band transitions
//! - **Orchestration**: `tick()` driven by the host scheduler (`runner`
//!   module for a self-contained loop)
//!
//! Failure policy: device and audio failures are logged and never propagate
//! out of the tick path; the engine prioritizes availability. The per-device
//! write cache advances only on confirmed success, so the unconditional
//! re-apply on the next tick retries after a transient fault.

// Module declarations
pub mod bands;
pub mod error;
pub mod filter;
pub mod mocks;
pub mod reader;
pub mod runner;
pub mod util;

use crate::bands::RangeBand;
use crate::error::{BuildError, FeedbackError, Result};
use crate::reader::SharedDistance;
use proximo_traits::{AudioSink, HapticDevice, LedMode, ThermalMode, VibrationMode};
use std::marker::PhantomData;

/// Thermal regulation configuration.
#[derive(Debug, Clone)]
pub struct ThermalCfg {
    /// No corrective write while |sensed - target| <= deadband (°C).
    pub deadband_c: f32,
    /// Assumed device temperature when the sensor reports nothing (°C).
    pub fallback_temp_c: f32,
}

impl Default for ThermalCfg {
    fn default() -> Self {
        Self {
            deadband_c: 0.5,
            fallback_temp_c: 27.0,
        }
    }
}

impl From<proximo_config::ThermalCfg> for ThermalCfg {
    fn from(cfg: proximo_config::ThermalCfg) -> Self {
        Self {
            deadband_c: cfg.deadband_c,
            fallback_temp_c: cfg.fallback_temp_c,
        }
    }
}

/// Outcome of a single orchestrator tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// No sensor data yet; nothing applied this tick.
    NoData,
    /// Band unchanged; only the debounced re-apply ran.
    Steady(RangeBand),
    /// Band changed; actuation and audio were retargeted.
    Transition(RangeBand),
}

/// Last confirmed writes for one device. A cache for write suppression
/// only, not part of the domain model.
#[derive(Debug, Clone, Copy, Default)]
struct AppliedState {
    vibration: Option<(f32, f32)>,
    color: Option<[u8; 3]>,
    thermal_dir: Option<f32>,
}

struct DeviceSlot<D> {
    device: D,
    applied: AppliedState,
}

/// Unified engine for both dynamic (boxed) and generic (static dispatch)
/// variants. Drives every known device in lockstep.
pub struct FeedbackCore<D: HapticDevice, A: AudioSink> {
    devices: Vec<DeviceSlot<D>>,
    audio: A,
    shared: SharedDistance,
    thermal: ThermalCfg,
    previous_band: Option<RangeBand>,
    current_target_temp_c: f32,
}

impl<D: HapticDevice, A: AudioSink> core::fmt::Debug for FeedbackCore<D, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FeedbackCore")
            .field("devices", &self.devices.len())
            .field("previous_band", &self.previous_band)
            .field("target_temp_c", &self.current_target_temp_c)
            .finish()
    }
}

impl<D: HapticDevice, A: AudioSink> FeedbackCore<D, A> {
    /// One-time initialization before the first tick: enable looped
    /// playback of the audio cue. Failures are logged and the engine keeps
    /// running without audio.
    pub fn start(&mut self) {
        if let Err(e) = self.audio.play_looped() {
            tracing::warn!(error = %FeedbackError::Audio(e.to_string()), "audio start failed");
        }
    }

    /// One scheduler tick: read the shared distance, classify, and drive
    /// actuation. Device and audio failures never propagate out of here.
    pub fn tick(&mut self) -> TickStatus {
        let Some(distance) = self.shared.get() else {
            return TickStatus::NoData;
        };
        let band = RangeBand::classify(distance);
        let transition = self.previous_band != Some(band);
        if transition {
            tracing::info!(?band, distance_cm = distance, "band transition");
            self.previous_band = Some(band);
            self.current_target_temp_c = band.target().target_temp_c;
            self.adjust_volume(band);
        }
        // Unconditional re-apply: converges device state after an earlier
        // failed write; the per-device cache keeps the steady-state cost at
        // zero writes.
        self.apply_band(band);
        self.maintain_temperature();
        if transition {
            TickStatus::Transition(band)
        } else {
            TickStatus::Steady(band)
        }
    }

    /// Band most recently applied, if any valid distance has been seen.
    pub fn previous_band(&self) -> Option<RangeBand> {
        self.previous_band
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Apply the band's vibration and LED targets to every device, skipping
    /// writes whose target equals the last confirmed value.
    fn apply_band(&mut self, band: RangeBand) {
        let target = band.target();
        let pair = (target.vibration_intensity, target.vibration_hz);
        let rgb = util::color_to_rgb8(target.color);
        for slot in &mut self.devices {
            if slot.applied.vibration != Some(pair) {
                slot.device
                    .set_vibration(VibrationMode::Manual, pair.0, pair.1);
                match slot.device.write() {
                    Ok(()) => slot.applied.vibration = Some(pair),
                    Err(e) => {
                        let err = FeedbackError::DeviceWrite(e.to_string());
                        tracing::warn!(error = %err, "vibration write failed");
                    }
                }
            }
            if slot.applied.color != Some(rgb) {
                slot.device.set_led(LedMode::GlobalManual, rgb);
                match slot.device.write() {
                    Ok(()) => slot.applied.color = Some(rgb),
                    Err(e) => {
                        let err = FeedbackError::DeviceWrite(e.to_string());
                        tracing::warn!(error = %err, "led write failed");
                    }
                }
            }
        }
    }

    /// Bang-bang thermal regulation, re-evaluated every tick independent of
    /// band transitions. Direction-only drive: +1.0 toward the target,
    /// -1.0 away, no write inside the deadband.
    fn maintain_temperature(&mut self) {
        let target = self.current_target_temp_c;
        for slot in &mut self.devices {
            let sensed = slot
                .device
                .sensed_temperature()
                .unwrap_or(self.thermal.fallback_temp_c);
            if (sensed - target).abs() <= self.thermal.deadband_c {
                continue;
            }
            let dir = if target > sensed { 1.0 } else { -1.0 };
            if slot.applied.thermal_dir != Some(dir) {
                slot.device.set_thermal(ThermalMode::Manual, dir);
                match slot.device.write() {
                    Ok(()) => slot.applied.thermal_dir = Some(dir),
                    Err(e) => {
                        let err = FeedbackError::DeviceWrite(e.to_string());
                        tracing::warn!(error = %err, "thermal write failed");
                    }
                }
            }
        }
    }

    fn adjust_volume(&mut self, band: RangeBand) {
        if let Err(e) = self.audio.set_volume(band.volume()) {
            tracing::warn!(error = %FeedbackError::Audio(e.to_string()), "volume adjust failed");
        }
    }
}

/// Public dynamic (boxed) engine that preserves a concrete API via
/// composition.
pub struct Feedback {
    inner: FeedbackCore<Box<dyn HapticDevice>, Box<dyn AudioSink>>,
}

impl core::fmt::Debug for Feedback {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl Feedback {
    /// Start building a Feedback engine.
    pub fn builder() -> FeedbackBuilder<Missing> {
        FeedbackBuilder::default()
    }

    /// One-time initialization before the first tick.
    pub fn start(&mut self) {
        self.inner.start();
    }

    /// One scheduler tick.
    pub fn tick(&mut self) -> TickStatus {
        self.inner.tick()
    }

    pub fn previous_band(&self) -> Option<RangeBand> {
        self.inner.previous_band()
    }

    pub fn device_count(&self) -> usize {
        self.inner.device_count()
    }
}

// Type-state markers for the builder
pub struct Missing;
pub struct Set;

/// Builder for `Feedback`. The audio sink is mandatory (type-state);
/// devices may be absent, in which case every write path no-ops.
pub struct FeedbackBuilder<A> {
    devices: Vec<Box<dyn HapticDevice>>,
    audio: Option<Box<dyn AudioSink>>,
    shared: Option<SharedDistance>,
    thermal: Option<ThermalCfg>,
    _a: PhantomData<A>,
}

impl Default for FeedbackBuilder<Missing> {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            audio: None,
            shared: None,
            thermal: None,
            _a: PhantomData,
        }
    }
}

impl<A> FeedbackBuilder<A> {
    pub fn with_device(mut self, device: impl HapticDevice + 'static) -> Self {
        self.devices.push(Box::new(device));
        self
    }

    /// Shared distance cell written by the background reader.
    pub fn with_shared(mut self, shared: SharedDistance) -> Self {
        self.shared = Some(shared);
        self
    }

    pub fn with_thermal(mut self, thermal: ThermalCfg) -> Self {
        self.thermal = Some(thermal);
        self
    }

    /// Fallible build available in any type-state; returns a detailed
    /// BuildError for missing pieces.
    pub fn try_build(self) -> Result<Feedback> {
        let FeedbackBuilder {
            devices,
            audio,
            shared,
            thermal,
            _a: _,
        } = self;
        let audio = audio.ok_or_else(|| eyre::Report::new(BuildError::MissingAudio))?;
        let thermal = thermal.unwrap_or_default();
        let shared = shared.unwrap_or_default();
        Ok(Feedback {
            inner: build_feedback(devices, audio, shared, thermal)?,
        })
    }
}

impl FeedbackBuilder<Missing> {
    pub fn with_audio(self, audio: impl AudioSink + 'static) -> FeedbackBuilder<Set> {
        let FeedbackBuilder {
            devices,
            audio: _,
            shared,
            thermal,
            _a: _,
        } = self;
        FeedbackBuilder {
            devices,
            audio: Some(Box::new(audio)),
            shared,
            thermal,
            _a: PhantomData,
        }
    }
}

impl FeedbackBuilder<Set> {
    /// Validate and build. Only available once the audio sink is set.
    pub fn build(self) -> Result<Feedback> {
        self.try_build()
    }
}

/// Generic, statically-dispatched alias using the unified core.
pub type FeedbackG<D, A> = FeedbackCore<D, A>;

/// Build a generic, statically-dispatched engine from concrete devices and
/// audio sink.
pub fn build_feedback<D, A>(
    devices: Vec<D>,
    audio: A,
    shared: SharedDistance,
    thermal: ThermalCfg,
) -> Result<FeedbackG<D, A>>
where
    D: HapticDevice + 'static,
    A: AudioSink + 'static,
{
    if !thermal.deadband_c.is_finite() || thermal.deadband_c < 0.0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "deadband_c must be >= 0",
        )));
    }
    if !thermal.fallback_temp_c.is_finite() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "fallback_temp_c must be finite",
        )));
    }
    if devices.is_empty() {
        // Degrade to no-op actuation rather than failing; the audio cue and
        // ingestion still run.
        tracing::warn!(error = %FeedbackError::MissingActuators, "running without actuators");
    }
    let current_target_temp_c = thermal.fallback_temp_c;
    Ok(FeedbackCore {
        devices: devices
            .into_iter()
            .map(|device| DeviceSlot {
                device,
                applied: AppliedState::default(),
            })
            .collect(),
        audio,
        shared,
        thermal,
        previous_band: None,
        current_target_temp_c,
    })
}
