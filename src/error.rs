//! Unified error types for the geofence monitor.
//!
//! Each port has its own error enum so callers can match on the exact
//! failure; [`MonitorError`] is what a single evaluation cycle returns.
//!
//! | Error                  | Severity  | Recovery                          |
//! |------------------------|-----------|-----------------------------------|
//! | [`ConfigError`]        | fatal     | rejected at configuration time    |
//! | [`LocationError`]      | transient | retried on the next cycle         |
//! | [`AlertError`]         | transient | logged; status is never reverted  |

use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Invalid zone or monitor parameters, or a config store failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("radius must be a finite number of km greater than zero, got {0}")]
    InvalidRadius(f64),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    /// A config field failed range validation.
    #[error("validation failed: {0}")]
    ValidationFailed(&'static str),

    /// No config found in storage.
    #[error("config not found")]
    NotFound,

    /// Stored config could not be parsed.
    #[error("config corrupted: {0}")]
    Corrupted(String),

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Location errors
// ---------------------------------------------------------------------------

/// Why the location source could not produce a fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The host revoked or never granted location access.
    /// Latched by the monitor until the host re-authorizes.
    #[error("permission to access location was denied")]
    PermissionDenied,

    /// No signal, timeout, or an exhausted replay track.
    #[error("no position fix available")]
    NoFix,

    /// Source-specific failure (I/O, parse error, driver fault).
    #[error("location source failed: {0}")]
    Source(String),
}

impl LocationError {
    /// Whether this failure persists until the host intervenes.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}

// ---------------------------------------------------------------------------
// Alert errors
// ---------------------------------------------------------------------------

/// Delivery failure reported by an alert sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlertError {
    /// The transport could not reach the relay.
    #[error("alert transport failed: {0}")]
    Transport(String),

    /// The relay answered but refused or failed to deliver.
    #[error("alert rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

// ---------------------------------------------------------------------------
// Cycle errors
// ---------------------------------------------------------------------------

/// Error returned by one evaluation cycle.
///
/// Alert delivery failures never fail a cycle; they surface as
/// [`MonitorEvent::AlertFailed`](crate::app::events::MonitorEvent::AlertFailed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    /// The poller was stopped; no further cycles will run.
    #[error("monitor stopped")]
    Stopped,

    /// A previous cycle panicked while holding the monitor lock.
    #[error("monitor state poisoned")]
    Poisoned,
}

/// Failure to launch the poller.
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn poller thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Crate-wide `Result` alias for evaluation cycles.
pub type Result<T> = core::result::Result<T, MonitorError>;
