//! Integration tests for the GeofenceMonitor → AlertSink pipeline.
//!
//! Drive `evaluate_once` directly against mock ports and check the alert
//! policy: one alert per exit, never on repeated outside samples, never on
//! re-entry.

use crate::mock_ports::{RecordingAlerts, RecordingEvents, ScriptedLocation};

use geofence::app::events::MonitorEvent;
use geofence::error::{AlertError, LocationError, MonitorError};
use geofence::fence::Status;
use geofence::geo::Coordinate;
use geofence::GeofenceMonitor;

const INSIDE: (f64, f64) = (0.0, 0.005);
const OUTSIDE: (f64, f64) = (0.0, 0.02);

fn origin_monitor() -> GeofenceMonitor {
    GeofenceMonitor::configure(Coordinate::new(0.0, 0.0), 1.0).unwrap()
}

fn run(points: &[(f64, f64)]) -> (GeofenceMonitor, RecordingAlerts, RecordingEvents) {
    let mut m = origin_monitor();
    let mut loc = ScriptedLocation::fixes(points);
    let mut alerts = RecordingAlerts::new();
    let mut events = RecordingEvents::new();
    for _ in points {
        m.evaluate_once(&mut loc, &mut alerts, &mut events).unwrap();
    }
    (m, alerts, events)
}

#[test]
fn starts_unknown() {
    let m = origin_monitor();
    assert_eq!(m.status(), Status::Unknown);
    assert!(m.last_sample().is_none());
}

#[test]
fn inside_then_outside_alerts_once() {
    let (m, alerts, _) = run(&[INSIDE, OUTSIDE]);
    assert_eq!(m.status(), Status::Outside);
    assert_eq!(alerts.sent.len(), 1);
    assert_eq!(alerts.sent[0].coordinate, Coordinate::new(OUTSIDE.0, OUTSIDE.1));
}

#[test]
fn repeated_outside_samples_do_not_realert() {
    let (_, alerts, _) = run(&[INSIDE, OUTSIDE, OUTSIDE, OUTSIDE, OUTSIDE]);
    assert_eq!(alerts.sent.len(), 1);
}

#[test]
fn reentry_then_exit_alerts_again() {
    let (_, alerts, _) = run(&[INSIDE, OUTSIDE, INSIDE, OUTSIDE]);
    assert_eq!(alerts.sent.len(), 2, "second exit must alert exactly once more");
}

#[test]
fn reentry_never_alerts() {
    let (m, alerts, _) = run(&[INSIDE, INSIDE, INSIDE]);
    assert_eq!(m.status(), Status::Inside);
    assert!(alerts.sent.is_empty());
}

#[test]
fn first_sample_outside_alerts() {
    let (_, alerts, events) = run(&[OUTSIDE]);
    assert_eq!(alerts.sent.len(), 1);
    assert_eq!(
        events.count(|e| matches!(
            e,
            MonitorEvent::StatusChanged {
                from: Status::Unknown,
                to: Status::Outside
            }
        )),
        1
    );
}

#[test]
fn delhi_fix_near_center_is_inside_without_alert() {
    let mut m = GeofenceMonitor::configure(Coordinate::new(28.6139, 77.2090), 0.5).unwrap();
    let mut loc = ScriptedLocation::fixes(&[(28.6140, 77.2091)]);
    let mut alerts = RecordingAlerts::new();
    let mut events = RecordingEvents::new();

    let s = m.evaluate_once(&mut loc, &mut alerts, &mut events).unwrap();
    assert_eq!(s.status, Status::Inside);
    assert!(s.distance_km < 0.02, "got {}", s.distance_km);
    assert!(alerts.sent.is_empty());
}

#[test]
fn delhi_fix_across_town_is_outside_with_one_alert() {
    let mut m = GeofenceMonitor::configure(Coordinate::new(28.6139, 77.2090), 0.5).unwrap();
    let mut loc = ScriptedLocation::fixes(&[(28.62, 77.22)]);
    let mut alerts = RecordingAlerts::new();
    let mut events = RecordingEvents::new();

    let s = m.evaluate_once(&mut loc, &mut alerts, &mut events).unwrap();
    assert_eq!(s.status, Status::Outside);
    assert!((s.distance_km - 1.3).abs() < 0.1, "got {}", s.distance_km);
    assert_eq!(alerts.sent, vec![s]);
    assert_eq!(events.count(|e| matches!(e, MonitorEvent::AlertSent(_))), 1);
}

#[test]
fn location_failure_returns_error_and_keeps_classified_status() {
    let mut m = origin_monitor();
    let mut loc = ScriptedLocation::new(vec![
        Ok(Coordinate::new(INSIDE.0, INSIDE.1)),
        Err(LocationError::NoFix),
    ]);
    let mut alerts = RecordingAlerts::new();
    let mut events = RecordingEvents::new();

    m.evaluate_once(&mut loc, &mut alerts, &mut events).unwrap();
    let err = m.evaluate_once(&mut loc, &mut alerts, &mut events).unwrap_err();
    assert_eq!(err, MonitorError::LocationUnavailable(LocationError::NoFix));

    assert_eq!(m.status(), Status::Inside);
    let snap = m.snapshot();
    assert_eq!(snap.visible_status(), Status::Unknown);
    assert_eq!(snap.cycles, 2);
    assert_eq!(
        events.count(|e| matches!(e, MonitorEvent::LocationUnavailable(LocationError::NoFix))),
        1
    );
}

#[test]
fn fix_after_dropout_clears_error() {
    let mut m = origin_monitor();
    let mut loc = ScriptedLocation::new(vec![
        Err(LocationError::NoFix),
        Ok(Coordinate::new(INSIDE.0, INSIDE.1)),
    ]);
    let mut alerts = RecordingAlerts::new();
    let mut events = RecordingEvents::new();

    assert!(m.evaluate_once(&mut loc, &mut alerts, &mut events).is_err());
    m.evaluate_once(&mut loc, &mut alerts, &mut events).unwrap();
    assert!(m.last_error().is_none());
    assert_eq!(m.snapshot().visible_status(), Status::Inside);
}

#[test]
fn dropout_while_outside_does_not_realert() {
    let mut m = origin_monitor();
    let mut loc = ScriptedLocation::new(vec![
        Ok(Coordinate::new(OUTSIDE.0, OUTSIDE.1)),
        Err(LocationError::NoFix),
        Ok(Coordinate::new(OUTSIDE.0, OUTSIDE.1)),
    ]);
    let mut alerts = RecordingAlerts::new();
    let mut events = RecordingEvents::new();

    for _ in 0..3 {
        let _ = m.evaluate_once(&mut loc, &mut alerts, &mut events);
    }
    assert_eq!(alerts.sent.len(), 1);
}

#[test]
fn permission_denied_is_latched_until_reauthorized() {
    let mut m = origin_monitor();
    let mut loc = ScriptedLocation::new(vec![
        Err(LocationError::PermissionDenied),
        Ok(Coordinate::new(INSIDE.0, INSIDE.1)),
    ]);
    let mut alerts = RecordingAlerts::new();
    let mut events = RecordingEvents::new();

    for _ in 0..3 {
        let err = m.evaluate_once(&mut loc, &mut alerts, &mut events).unwrap_err();
        assert_eq!(err, MonitorError::LocationUnavailable(LocationError::PermissionDenied));
    }
    assert_eq!(loc.calls, 1, "source must not be queried while denied");
    assert!(!m.is_authorized());

    m.reauthorize();
    let s = m.evaluate_once(&mut loc, &mut alerts, &mut events).unwrap();
    assert_eq!(s.status, Status::Inside);
    assert_eq!(loc.calls, 2);
}

#[test]
fn alert_failure_does_not_revert_or_retry() {
    let mut m = origin_monitor();
    let mut loc = ScriptedLocation::fixes(&[INSIDE, OUTSIDE, OUTSIDE]);
    let mut alerts = RecordingAlerts::failing(AlertError::Rejected {
        status: 500,
        message: "Invalid login".into(),
    });
    let mut events = RecordingEvents::new();

    for _ in 0..3 {
        m.evaluate_once(&mut loc, &mut alerts, &mut events).unwrap();
    }
    assert_eq!(m.status(), Status::Outside);
    assert_eq!(alerts.sent.len(), 1, "failed alert must not be retried");
    assert_eq!(m.snapshot().alerts_failed, 1);
    assert_eq!(events.count(|e| matches!(e, MonitorEvent::AlertFailed { .. })), 1);
}

#[test]
fn every_successful_cycle_emits_a_sample_event() {
    let (_, _, events) = run(&[INSIDE, OUTSIDE, OUTSIDE]);
    assert_eq!(events.count(|e| matches!(e, MonitorEvent::Sampled(_))), 3);
    assert_eq!(events.count(|e| matches!(e, MonitorEvent::StatusChanged { .. })), 2);
}
