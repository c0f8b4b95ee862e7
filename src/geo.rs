//! Coordinates and great-circle distance.
//!
//! Pure math, no I/O. The monitor calls [`distance_km`] once per cycle to
//! measure how far the latest fix is from the zone center.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude, [-90, 90].
    pub latitude: f64,
    /// Longitude, [-180, 180].
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate without range checks.
    ///
    /// Location sources hand out raw fixes through this; use
    /// [`Coordinate::validated`] for values that come from configuration.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a coordinate, rejecting non-finite or out-of-range values.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, ConfigError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ConfigError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }
}

impl core::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Great-circle distance between `a` and `b` in kilometres (haversine).
///
/// Symmetric in its arguments and exactly `0.0` for identical points.
///
/// # Preconditions
///
/// Both coordinates must lie in the valid latitude/longitude range. This is
/// a caller contract and is not checked here.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    // Rounding can push h a hair past 1.0 for antipodal points.
    let h = ((d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
