//! Monitor configuration parameters
//!
//! All tunable parameters for the geofence monitor. Values are loaded from a
//! JSON file through a [`ConfigPort`](crate::app::ports::ConfigPort); missing
//! fields fall back to the defaults below.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fence::Geofence;
use crate::geo::Coordinate;

/// Safe-zone definition as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// Zone radius in kilometres.
    pub radius_km: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            latitude: 28.6139,
            longitude: 77.2090,
            radius_km: 0.5,
        }
    }
}

/// Core monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Zone ---
    pub zone: ZoneConfig,

    // --- Timing ---
    /// Location poll interval (milliseconds)
    pub poll_interval_ms: u64,

    // --- Alerting ---
    /// Identifier reported with every alert
    pub device_id: String,
    /// Base URL of the alert relay, e.g. `http://192.168.1.20:3000`.
    /// `None` logs alerts locally instead of sending them.
    pub alert_endpoint: Option<String>,
    /// HTTP timeout for a single alert request (milliseconds)
    pub alert_timeout_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            zone: ZoneConfig::default(),

            poll_interval_ms: 5 * 60 * 1000, // every 5 minutes

            device_id: "unknown".to_string(),
            alert_endpoint: None,
            alert_timeout_ms: 10_000,
        }
    }
}

impl MonitorConfig {
    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geofence()?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.device_id.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("device_id must not be empty"));
        }
        if self.alert_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("alert_timeout_ms must be > 0"));
        }
        if let Some(endpoint) = &self.alert_endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::ValidationFailed(
                    "alert_endpoint must be an http:// or https:// URL",
                ));
            }
        }
        Ok(())
    }

    /// Build the validated zone.
    pub fn geofence(&self) -> Result<Geofence, ConfigError> {
        Geofence::new(
            Coordinate::new(self.zone.latitude, self.zone.longitude),
            self.zone.radius_km,
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn alert_timeout(&self) -> Duration {
        Duration::from_millis(self.alert_timeout_ms)
    }
}
