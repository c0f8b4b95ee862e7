//! Outbound monitor events.
//!
//! The [`GeofenceMonitor`](super::service::GeofenceMonitor) and the
//! [poller](crate::scheduler) emit these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them.

use core::time::Duration;

use crate::error::{AlertError, LocationError};
use crate::fence::{Geofence, SampleResult, Status};

/// Structured events emitted by the monitor core.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Periodic polling has started.
    Started { geofence: Geofence, interval: Duration },

    /// A cycle produced a fresh sample.
    Sampled(SampleResult),

    /// The classified status differs from the previous cycle's.
    StatusChanged { from: Status, to: Status },

    /// The alert sink accepted an exit alert.
    AlertSent(SampleResult),

    /// The alert sink failed; the status transition stands.
    AlertFailed { sample: SampleResult, error: AlertError },

    /// The location source produced no fix this cycle.
    LocationUnavailable(LocationError),

    /// Periodic polling has ended; no further scheduled cycles.
    Stopped,
}
