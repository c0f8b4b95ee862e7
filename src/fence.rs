//! Geofence containment.
//!
//! The classification step is pure: given a fix and the zone it returns a
//! [`SampleResult`] and nothing else. Deciding whether to alert happens in
//! the [`GeofenceMonitor`](crate::app::service::GeofenceMonitor), which
//! compares consecutive statuses.
//!
//! ```text
//!  Coordinate ──▶ distance_km(center) ──▶ <= radius ? Inside : Outside
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geo::{Coordinate, distance_km};

/// A circular safe zone.
///
/// Only constructible through [`Geofence::new`], so every instance has a
/// valid center and a strictly positive radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geofence {
    center: Coordinate,
    radius_km: f64,
}

impl Geofence {
    pub fn new(center: Coordinate, radius_km: f64) -> Result<Self, ConfigError> {
        let center = Coordinate::validated(center.latitude, center.longitude)?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(ConfigError::InvalidRadius(radius_km));
        }
        Ok(Self { center, radius_km })
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Classify one fix against this zone.
    ///
    /// The boundary itself counts as inside.
    pub fn classify(&self, coordinate: Coordinate, timestamp: DateTime<Utc>) -> SampleResult {
        let distance_km = distance_km(coordinate, self.center);
        let status = if distance_km <= self.radius_km {
            Status::Inside
        } else {
            Status::Outside
        };
        SampleResult {
            coordinate,
            distance_km,
            status,
            timestamp,
        }
    }
}

/// Containment status of the most recent fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No successful sample yet, or the latest cycle had no fix.
    #[default]
    Unknown,
    Inside,
    Outside,
}

impl Status {
    /// Whether moving from `self` to `next` is an exit that warrants an alert.
    ///
    /// `Unknown → Outside` counts: the first observation being outside is
    /// alertable. `Outside → Outside` never is.
    pub fn is_exit_to(self, next: Status) -> bool {
        next == Status::Outside && self != Status::Outside
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Inside => write!(f, "inside"),
            Self::Outside => write!(f, "outside"),
        }
    }
}

/// Outcome of one evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleResult {
    pub coordinate: Coordinate,
    /// Distance to the zone center, always >= 0.
    pub distance_km: f64,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
}
