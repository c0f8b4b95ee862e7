//! Port traits — the hexagonal boundary between the monitor and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GeofenceMonitor (domain)
//! ```
//!
//! Driven adapters (GPS / replay tracks, alert relays, loggers, config
//! files) implement these traits. The
//! [`GeofenceMonitor`](super::service::GeofenceMonitor) consumes them via
//! generics, so the domain core never performs I/O directly.

use crate::config::MonitorConfig;
use crate::error::{AlertError, ConfigError, LocationError};
use crate::fence::SampleResult;
use crate::geo::Coordinate;

use super::events::MonitorEvent;

// ───────────────────────────────────────────────────────────────
// Location port (driven adapter: positioning → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the monitor calls this once per cycle.
///
/// The host must have obtained location authorization before the first
/// call. Returning [`LocationError::PermissionDenied`] makes the monitor
/// stop querying this source until it is re-authorized.
pub trait LocationSource {
    /// Produce one fresh position fix.
    fn current_position(&mut self) -> Result<Coordinate, LocationError>;
}

impl<T: LocationSource + ?Sized> LocationSource for Box<T> {
    fn current_position(&mut self) -> Result<Coordinate, LocationError> {
        (**self).current_position()
    }
}

// ───────────────────────────────────────────────────────────────
// Alert port (driven adapter: domain → email relay / push / log)
// ───────────────────────────────────────────────────────────────

/// Write-side port: receives the sample that crossed out of the zone.
///
/// Delivery retries, if any, belong to the implementation. The monitor
/// calls `notify` at most once per exit transition.
pub trait AlertSink {
    fn notify(&mut self, sample: &SampleResult) -> Result<(), AlertError>;
}

impl<T: AlertSink + ?Sized> AlertSink for Box<T> {
    fn notify(&mut self, sample: &SampleResult) -> Result<(), AlertError> {
        (**self).notify(sample)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / status UI)
// ───────────────────────────────────────────────────────────────

/// The monitor emits structured [`MonitorEvent`]s through this port.
/// Adapters decide where they go (log, status display, telemetry).
pub trait EventSink {
    fn emit(&mut self, event: &MonitorEvent);
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&mut self, event: &MonitorEvent) {
        (**self).emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists monitor configuration.
///
/// Implementations MUST validate before persisting and reject invalid
/// values with a [`ConfigError`] rather than clamping them.
pub trait ConfigPort {
    /// Load configuration. Returns [`ConfigError::NotFound`] if none exists.
    fn load(&self) -> Result<MonitorConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &MonitorConfig) -> Result<(), ConfigError>;
}
