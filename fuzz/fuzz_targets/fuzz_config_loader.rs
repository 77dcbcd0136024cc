#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Fuzz TOML parsing of Config: invalid input must be rejected
    // gracefully, never panic.
    let parsed = toml::from_str::<proximo_config::Config>(data);
    match parsed {
        Ok(mut cfg) => {
            // Ensure validate() does not panic
            let _ = cfg.validate();
        }
        Err(_e) => {
            // parse error is acceptable
        }
    }
});
