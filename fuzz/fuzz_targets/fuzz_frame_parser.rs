#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Serial lines come straight off the wire, so the frame parser must
    // tolerate any byte salad: error out, never panic.
    match proximo_core::reader::parse_frame(data) {
        Ok(cm) => {
            assert!(cm.is_finite());
            assert!((0.0..=200.0).contains(&cm));
        }
        Err(_e) => {}
    }
});
