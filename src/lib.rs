//! Geofence monitor library.
//!
//! Samples a device position on a fixed cadence, decides whether it lies
//! inside a circular safe zone, and raises one alert per exit. Positioning
//! and notification are reached through port traits in [`app::ports`];
//! concrete adapters live in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod fence;
pub mod geo;
pub mod scheduler;

pub use app::service::{GeofenceMonitor, MonitorSnapshot};
pub use error::{AlertError, ConfigError, LocationError, MonitorError};
pub use fence::{Geofence, SampleResult, Status};
pub use geo::{Coordinate, distance_km};
pub use scheduler::{MonitorHandle, start};
