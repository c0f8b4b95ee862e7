//! Mock port adapters for integration tests.
//!
//! Record every alert and event so tests can assert on the full history
//! without a GPS receiver or a mail relay.

use std::collections::VecDeque;
use std::sync::{Arc, Barrier};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use geofence::app::events::MonitorEvent;
use geofence::app::ports::{AlertSink, EventSink, LocationSource};
use geofence::error::{AlertError, LocationError};
use geofence::fence::SampleResult;
use geofence::geo::Coordinate;

// ── ScriptedLocation ─────────────────────────────────────────

/// Plays back a script of fixes and failures; repeats the last entry.
pub struct ScriptedLocation {
    script: VecDeque<Result<Coordinate, LocationError>>,
    last: Result<Coordinate, LocationError>,
    pub calls: usize,
}

#[allow(dead_code)]
impl ScriptedLocation {
    pub fn new(script: Vec<Result<Coordinate, LocationError>>) -> Self {
        Self {
            script: script.into(),
            last: Err(LocationError::NoFix),
            calls: 0,
        }
    }

    pub fn fixes(points: &[(f64, f64)]) -> Self {
        Self::new(
            points
                .iter()
                .map(|&(lat, lon)| Ok(Coordinate::new(lat, lon)))
                .collect(),
        )
    }
}

impl LocationSource for ScriptedLocation {
    fn current_position(&mut self) -> Result<Coordinate, LocationError> {
        self.calls += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last.clone()
    }
}

// ── RecordingAlerts ──────────────────────────────────────────

#[derive(Default)]
pub struct RecordingAlerts {
    pub sent: Vec<SampleResult>,
    /// When set, every notify fails with this error (after recording).
    pub fail_with: Option<AlertError>,
}

#[allow(dead_code)]
impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: AlertError) -> Self {
        Self {
            sent: Vec::new(),
            fail_with: Some(error),
        }
    }
}

impl AlertSink for RecordingAlerts {
    fn notify(&mut self, sample: &SampleResult) -> Result<(), AlertError> {
        self.sent.push(*sample);
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

// ── RecordingEvents ──────────────────────────────────────────

#[derive(Default)]
pub struct RecordingEvents {
    pub events: Vec<MonitorEvent>,
}

#[allow(dead_code)]
impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&MonitorEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingEvents {
    fn emit(&mut self, event: &MonitorEvent) {
        self.events.push(event.clone());
    }
}

// ── Overlap detector ─────────────────────────────────────────

/// Location source that sleeps inside every call and records the highest
/// number of calls that were ever in flight at once.
pub struct SlowLocation {
    pub in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
    pub delay: Duration,
}

impl LocationSource for SlowLocation {
    fn current_position(&mut self) -> Result<Coordinate, LocationError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(Coordinate::new(0.0, 0.0))
    }
}

/// Location source whose first call parks on two barriers: one to tell the
/// test it has entered the cycle, one to wait for permission to finish.
/// Later calls return at once.
pub struct GatedLocation {
    pub entered: Arc<Barrier>,
    pub release: Arc<Barrier>,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl GatedLocation {
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Barrier::new(2)),
            release: Arc::new(Barrier::new(2)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl LocationSource for GatedLocation {
    fn current_position(&mut self) -> Result<Coordinate, LocationError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.entered.wait();
            self.release.wait();
        }
        Ok(Coordinate::new(0.0, 0.005))
    }
}

// ── Helpers ──────────────────────────────────────────────────

/// Poll `cond` until it holds or `timeout` elapses.
#[allow(dead_code)]
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}
