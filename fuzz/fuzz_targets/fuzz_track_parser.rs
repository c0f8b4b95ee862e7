//! Fuzz target: replay track parser
//!
//! Feeds arbitrary text to `ReplayLocationSource::parse` and verifies:
//! - No panics under arbitrary input
//! - Every accepted fix is inside the valid latitude/longitude range
//! - Distances between accepted fixes are finite and non-negative
//!
//! cargo fuzz run fuzz_track_parser

#![no_main]

use geofence::adapters::replay::ReplayLocationSource;
use geofence::app::ports::LocationSource;
use geofence::geo::{Coordinate, distance_km};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(mut track) = ReplayLocationSource::parse(text, false) else {
        return;
    };

    let origin = Coordinate::new(0.0, 0.0);
    for _ in 0..track.len() {
        let fix = track
            .current_position()
            .expect("parsed track must yield every fix once");
        assert!((-90.0..=90.0).contains(&fix.latitude));
        assert!((-180.0..=180.0).contains(&fix.longitude));
        let d = distance_km(origin, fix);
        assert!(d.is_finite() && d >= 0.0, "bad distance {d} for {fix}");
    }
    assert!(track.current_position().is_err());
});
