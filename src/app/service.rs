//! Geofence monitor — the hexagonal core.
//!
//! [`GeofenceMonitor`] owns the zone, the last classified status and the
//! last sample. All I/O flows through port traits injected at call sites,
//! so the whole decision path is testable with mock adapters.
//!
//! ```text
//!  LocationSource ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                     │    GeofenceMonitor     │
//!                     │  classify · transition │ ──▶ AlertSink
//!                     └────────────────────────┘
//! ```
//!
//! One cycle is: fix → classify → record → alert on exit. The alert step
//! only reads the transition; a delivery failure never touches the status.

use chrono::Utc;
use log::{debug, info, warn};

use crate::error::{ConfigError, LocationError, Result};
use crate::fence::{Geofence, SampleResult, Status};
use crate::geo::Coordinate;

use super::events::MonitorEvent;
use super::ports::{AlertSink, EventSink, LocationSource};

// ───────────────────────────────────────────────────────────────
// Snapshot
// ───────────────────────────────────────────────────────────────

/// Read-only view of the monitor, for status displays and RPC read-back.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSnapshot {
    /// Status of the last successful sample.
    pub status: Status,
    pub last_sample: Option<SampleResult>,
    /// Set when the most recent cycle had no fix.
    pub last_error: Option<LocationError>,
    pub cycles: u64,
    pub alerts_sent: u64,
    pub alerts_failed: u64,
}

impl MonitorSnapshot {
    /// Status to show a user.
    ///
    /// `Unknown` while the latest cycle failed, so stale data is never
    /// presented as current.
    pub fn visible_status(&self) -> Status {
        if self.last_error.is_some() {
            Status::Unknown
        } else {
            self.status
        }
    }
}

// ───────────────────────────────────────────────────────────────
// GeofenceMonitor
// ───────────────────────────────────────────────────────────────

/// Single-zone exit detector.
pub struct GeofenceMonitor {
    geofence: Geofence,
    status: Status,
    last_sample: Option<SampleResult>,
    last_error: Option<LocationError>,
    /// Cleared when the source reports `PermissionDenied`.
    authorized: bool,
    cycles: u64,
    alerts_sent: u64,
    alerts_failed: u64,
}

impl GeofenceMonitor {
    /// Construct the monitor around an already validated zone.
    pub fn new(geofence: Geofence) -> Self {
        Self {
            geofence,
            status: Status::Unknown,
            last_sample: None,
            last_error: None,
            authorized: true,
            cycles: 0,
            alerts_sent: 0,
            alerts_failed: 0,
        }
    }

    /// Validate the zone parameters and construct the monitor.
    pub fn configure(center: Coordinate, radius_km: f64) -> core::result::Result<Self, ConfigError> {
        let geofence = Geofence::new(center, radius_km)?;
        info!(
            "Geofence configured: center={} radius={}km",
            geofence.center(),
            geofence.radius_km()
        );
        Ok(Self::new(geofence))
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full cycle: fix → classify → record → alert on exit.
    ///
    /// Returns the sample even when it caused a transition. Fails only
    /// when no fix could be obtained; alert delivery errors are reported
    /// through `events` instead.
    pub fn evaluate_once(
        &mut self,
        location: &mut impl LocationSource,
        alerts: &mut impl AlertSink,
        events: &mut impl EventSink,
    ) -> Result<SampleResult> {
        self.cycles += 1;

        // 1. Position fix
        let coordinate = match self.read_position(location) {
            Ok(c) => c,
            Err(e) => {
                warn!("Cycle {}: location unavailable: {}", self.cycles, e);
                self.last_error = Some(e.clone());
                events.emit(&MonitorEvent::LocationUnavailable(e.clone()));
                return Err(e.into());
            }
        };

        // 2. Classification (pure)
        let sample = self.geofence.classify(coordinate, Utc::now());
        debug!(
            "Cycle {}: {} is {:.3}km from center -> {}",
            self.cycles, sample.coordinate, sample.distance_km, sample.status
        );

        // 3. Record
        let previous = self.status;
        self.status = sample.status;
        self.last_sample = Some(sample);
        self.last_error = None;
        events.emit(&MonitorEvent::Sampled(sample));

        if previous != sample.status {
            info!("Status {} -> {}", previous, sample.status);
            events.emit(&MonitorEvent::StatusChanged {
                from: previous,
                to: sample.status,
            });
        }

        // 4. Alert on exit only
        if previous.is_exit_to(sample.status) {
            self.dispatch_alert(&sample, alerts, events);
        }

        Ok(sample)
    }

    /// Lift a latched permission denial after the host re-authorized.
    pub fn reauthorize(&mut self) {
        if !self.authorized {
            info!("Location access re-authorized");
        }
        self.authorized = true;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn geofence(&self) -> &Geofence {
        &self.geofence
    }

    /// Status of the last successful sample.
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn last_sample(&self) -> Option<&SampleResult> {
        self.last_sample.as_ref()
    }

    pub fn last_error(&self) -> Option<&LocationError> {
        self.last_error.as_ref()
    }

    /// Whether the location source may currently be queried.
    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Total cycles attempted, including failed ones.
    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            status: self.status,
            last_sample: self.last_sample,
            last_error: self.last_error.clone(),
            cycles: self.cycles,
            alerts_sent: self.alerts_sent,
            alerts_failed: self.alerts_failed,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn read_position(
        &mut self,
        location: &mut impl LocationSource,
    ) -> core::result::Result<Coordinate, LocationError> {
        if !self.authorized {
            return Err(LocationError::PermissionDenied);
        }
        let result = location.current_position();
        if let Err(e) = &result {
            if e.is_permanent() {
                warn!("Location permission denied; polling paused until re-authorized");
                self.authorized = false;
            }
        }
        result
    }

    fn dispatch_alert(
        &mut self,
        sample: &SampleResult,
        alerts: &mut impl AlertSink,
        events: &mut impl EventSink,
    ) {
        match alerts.notify(sample) {
            Ok(()) => {
                self.alerts_sent += 1;
                info!(
                    "Exit alert sent for {} ({:.3}km from center)",
                    sample.coordinate, sample.distance_km
                );
                events.emit(&MonitorEvent::AlertSent(*sample));
            }
            Err(error) => {
                self.alerts_failed += 1;
                warn!("Exit alert delivery failed: {}", error);
                events.emit(&MonitorEvent::AlertFailed {
                    sample: *sample,
                    error,
                });
            }
        }
    }
}
