//! Log-based adapters.
//!
//! [`LogEventSink`] implements [`EventSink`] by writing every monitor event
//! as a one-line record through the `log` facade. [`LogAlertSink`] is the
//! fallback alert sink when no relay endpoint is configured.

use log::{info, warn};

use crate::app::events::MonitorEvent;
use crate::app::ports::{AlertSink, EventSink};
use crate::error::AlertError;
use crate::fence::SampleResult;

/// Adapter that logs every [`MonitorEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MonitorEvent) {
        match event {
            MonitorEvent::Started { geofence, interval } => {
                info!(
                    "START | center={} radius={}km | every {:?}",
                    geofence.center(),
                    geofence.radius_km(),
                    interval
                );
            }
            MonitorEvent::Sampled(s) => {
                info!(
                    "SAMPLE | {} | {:.3}km | {} | {}",
                    s.coordinate,
                    s.distance_km,
                    s.status,
                    s.timestamp.to_rfc3339()
                );
            }
            MonitorEvent::StatusChanged { from, to } => {
                info!("STATUS | {} -> {}", from, to);
            }
            MonitorEvent::AlertSent(s) => {
                info!("ALERT | sent for {}", s.coordinate);
            }
            MonitorEvent::AlertFailed { sample, error } => {
                warn!("ALERT | failed for {}: {}", sample.coordinate, error);
            }
            MonitorEvent::LocationUnavailable(e) => {
                warn!("LOCATION | {}", e);
            }
            MonitorEvent::Stopped => {
                info!("STOP | polling ended");
            }
        }
    }
}

/// Alert sink that only logs; never fails.
#[derive(Debug)]
pub struct LogAlertSink {
    device_id: String,
}

impl LogAlertSink {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
        }
    }
}

impl AlertSink for LogAlertSink {
    fn notify(&mut self, sample: &SampleResult) -> Result<(), AlertError> {
        warn!(
            "GeoFence Alert: device {} moved OUTSIDE the safe zone at {} ({:.3}km from center), {}",
            self.device_id,
            sample.coordinate,
            sample.distance_km,
            sample.timestamp.to_rfc3339()
        );
        Ok(())
    }
}
