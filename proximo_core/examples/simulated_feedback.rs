//! Minimal end-to-end run against a scripted sensor, no hardware needed.
//!
//! cargo run -p proximo_core --example simulated_feedback
use proximo_core::mocks::{NoopAudio, ScriptedSensor};
use proximo_core::reader::RangeReader;
use proximo_core::{Feedback, TickStatus};
use proximo_traits::clock::MonotonicClock;
use std::time::Duration;

fn main() -> eyre::Result<()> {
    let sensor = ScriptedSensor::new(["120.0", "70.0", "35.0", "15.0", "15.0", "90.0"]);
    let reader = RangeReader::spawn(
        sensor,
        Duration::from_millis(50),
        Duration::from_millis(10),
        1, // window of 1: pass samples straight through for the demo
        MonotonicClock::new(),
    );

    let mut feedback = Feedback::builder()
        .with_audio(NoopAudio)
        .with_shared(reader.shared())
        .build()?;
    feedback.start();

    for _ in 0..12 {
        std::thread::sleep(Duration::from_millis(15));
        match feedback.tick() {
            TickStatus::NoData => println!("tick: no sensor data yet"),
            TickStatus::Steady(band) => println!("tick: steady in {band:?}"),
            TickStatus::Transition(band) => println!("tick: entered {band:?}"),
        }
    }
    Ok(())
}
