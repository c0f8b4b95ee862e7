//! Fuzz target: config JSON
//!
//! Deserializes arbitrary bytes as `MonitorConfig` and verifies that
//! `validate()` never panics and that every config it accepts yields a
//! usable zone and a non-zero poll interval.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use geofence::config::MonitorConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<MonitorConfig>(data) else {
        return;
    };
    if config.validate().is_ok() {
        let fence = config.geofence().expect("validated config must build a geofence");
        assert!(fence.radius_km() > 0.0);
        assert!(!config.poll_interval().is_zero());
    }
});
