//! Periodic poller.
//!
//! Drives a [`GeofenceMonitor`] on a fixed cadence from a dedicated thread.
//! The thread runs an `edge-executor` task whose `async-io-mini` reactor
//! timer races an `embassy-sync` stop signal, so stopping never waits for
//! the rest of an interval.
//!
//! ```text
//!  ┌─────────────────────────────────────────────────────────────┐
//!  │  Poller thread                                              │
//!  │  ┌───────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                         │  │
//!  │  │                                                       │  │
//!  │  │   cycle ─▶ or(Timer::after(interval), STOP.wait()) ─┐ │  │
//!  │  │     ▲                                               │ │  │
//!  │  │     └───────────────────── Tick ────────────────────┘ │  │
//!  │  └───────────────────────────────────────────────────────┘  │
//!  └──────────────────────────┬──────────────────────────────────┘
//!                             │ Mutex<Monitored>
//!  ┌──────────────────────────┴──────────────────────────────────┐
//!  │  MonitorHandle: check_now() · snapshot() · stop()           │
//!  └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ticks fall on a fixed grid `start + n * interval`, so a slow cycle does
//! not push later samples back. A cycle that overruns one or more ticks
//! skips them; cycles never run back to back to catch up.
//!
//! Scheduled cycles and [`MonitorHandle::check_now`] take the same mutex,
//! so two cycles never overlap and transition detection stays race-free.
//! Stopping cancels future cycles only; an in-flight cycle completes.

use core::time::Duration;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::{debug, info, warn};

// Host time driver behind `async_io_mini::Timer`.
use embassy_time as _;

use crate::app::events::MonitorEvent;
use crate::app::ports::{AlertSink, EventSink, LocationSource};
use crate::app::service::{GeofenceMonitor, MonitorSnapshot};
use crate::error::{ConfigError, MonitorError, Result, StartError};
use crate::fence::SampleResult;

type StopSignal = Signal<CriticalSectionRawMutex, ()>;

// ── Monitor + its ports ──────────────────────────────────────

/// The monitor bundled with the adapters it is driven through.
pub struct Monitored<L, A, E> {
    pub monitor: GeofenceMonitor,
    pub location: L,
    pub alerts: A,
    pub events: E,
}

impl<L, A, E> Monitored<L, A, E>
where
    L: LocationSource,
    A: AlertSink,
    E: EventSink,
{
    pub fn new(monitor: GeofenceMonitor, location: L, alerts: A, events: E) -> Self {
        Self {
            monitor,
            location,
            alerts,
            events,
        }
    }

    /// One evaluation cycle against the bundled ports.
    pub fn cycle(&mut self) -> Result<SampleResult> {
        self.monitor
            .evaluate_once(&mut self.location, &mut self.alerts, &mut self.events)
    }
}

type Shared<L, A, E> = Arc<Mutex<Monitored<L, A, E>>>;

// ── Handle ───────────────────────────────────────────────────

/// Owner of a running poller.
///
/// Dropping the handle stops the poller without waiting for it.
pub struct MonitorHandle<L, A, E> {
    shared: Shared<L, A, E>,
    stop: Arc<StopSignal>,
    stopped: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl<L, A, E> MonitorHandle<L, A, E>
where
    L: LocationSource,
    A: AlertSink,
    E: EventSink,
{
    /// Run a manual cycle now, serialized with scheduled ones.
    ///
    /// Follows the same alert rule as scheduled cycles: a check while
    /// already outside does not alert again.
    pub fn check_now(&self) -> Result<SampleResult> {
        if self.is_stopped() {
            return Err(MonitorError::Stopped);
        }
        lock(&self.shared)?.cycle()
    }

    pub fn snapshot(&self) -> Result<MonitorSnapshot> {
        Ok(lock(&self.shared)?.monitor.snapshot())
    }

    /// Lift a latched permission denial.
    pub fn reauthorize(&self) -> Result<()> {
        lock(&self.shared)?.monitor.reauthorize();
        Ok(())
    }

    /// Borrow the monitor and its ports, serialized with cycles.
    pub fn with<R>(&self, f: impl FnOnce(&mut Monitored<L, A, E>) -> R) -> Result<R> {
        Ok(f(&mut *lock(&self.shared)?))
    }

    /// Cancel all future scheduled cycles. Idempotent and non-blocking.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Poller stop requested");
        self.stop.signal(());
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl<L, A, E> MonitorHandle<L, A, E> {
    /// Stop and wait for the poller thread to finish its in-flight cycle.
    pub fn join(mut self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            self.stop.signal(());
        }
        if let Some(handle) = self.join.take() {
            if handle.join().is_err() {
                warn!("Poller thread panicked");
            }
        }
    }
}

impl<L, A, E> Drop for MonitorHandle<L, A, E> {
    fn drop(&mut self) {
        // Best-effort: signal and detach; the thread exits after its
        // current cycle.
        if !self.stopped.swap(true, Ordering::AcqRel) {
            self.stop.signal(());
        }
        drop(self.join.take());
    }
}

// ── Start ────────────────────────────────────────────────────

/// Start periodic polling.
///
/// The first cycle runs immediately on the poller thread; later cycles
/// follow every `interval`. A failed cycle (no fix) is reported through
/// the event sink and the schedule continues.
pub fn start<L, A, E>(
    monitor: GeofenceMonitor,
    location: L,
    alerts: A,
    events: E,
    interval: Duration,
) -> core::result::Result<MonitorHandle<L, A, E>, StartError>
where
    L: LocationSource + Send + 'static,
    A: AlertSink + Send + 'static,
    E: EventSink + Send + 'static,
{
    if interval.is_zero() {
        return Err(ConfigError::ZeroInterval.into());
    }

    let mut monitored = Monitored::new(monitor, location, alerts, events);
    let geofence = *monitored.monitor.geofence();
    monitored
        .events
        .emit(&MonitorEvent::Started { geofence, interval });
    info!(
        "Poller started: center={} radius={}km interval={:?}",
        geofence.center(),
        geofence.radius_km(),
        interval
    );

    let shared: Shared<L, A, E> = Arc::new(Mutex::new(monitored));
    let stop = Arc::new(StopSignal::new());
    let stopped = Arc::new(AtomicBool::new(false));

    let thread_shared = Arc::clone(&shared);
    let thread_stop = Arc::clone(&stop);
    let thread_stopped = Arc::clone(&stopped);
    let join = thread::Builder::new()
        .name("geofence-poll".to_string())
        .spawn(move || run_poll_thread(thread_shared, thread_stop, thread_stopped, interval))?;

    Ok(MonitorHandle {
        shared,
        stop,
        stopped,
        join: Some(join),
    })
}

// ── Poll loop ────────────────────────────────────────────────

enum Wake {
    Tick,
    Stop,
}

async fn poll_loop<L, A, E>(
    shared: Shared<L, A, E>,
    stop: Arc<StopSignal>,
    stopped: Arc<AtomicBool>,
    interval: Duration,
) where
    L: LocationSource,
    A: AlertSink,
    E: EventSink,
{
    let start = Instant::now();
    let mut tick: u64 = 0;
    loop {
        if stopped.load(Ordering::Acquire) {
            break;
        }

        match lock(&shared) {
            Ok(mut m) => match m.cycle() {
                Ok(sample) => debug!("Scheduled cycle: {}", sample.status),
                // Already reported through the event sink; retry next tick.
                Err(e) => debug!("Scheduled cycle failed: {}", e),
            },
            Err(e) => {
                warn!("Poller exiting: {}", e);
                return;
            }
        }

        let (next, deadline) = next_tick(start, interval, Instant::now(), tick.saturating_add(1));
        let skipped = next.saturating_sub(tick.saturating_add(1));
        tick = next;
        if skipped > 0 {
            warn!("Cycle overran the poll interval; skipping {} tick(s)", skipped);
        }

        let wake = futures_lite::future::or(
            async {
                async_io_mini::Timer::at(deadline).await;
                Wake::Tick
            },
            async {
                stop.wait().await;
                Wake::Stop
            },
        )
        .await;

        if matches!(wake, Wake::Stop) {
            break;
        }
    }

    if let Ok(mut m) = lock(&shared) {
        m.events.emit(&MonitorEvent::Stopped);
    }
    info!("Poller stopped");
}

/// Entry point for the poller thread: drives the loop on a local executor.
fn run_poll_thread<L, A, E>(
    shared: Shared<L, A, E>,
    stop: Arc<StopSignal>,
    stopped: Arc<AtomicBool>,
    interval: Duration,
) where
    L: LocationSource,
    A: AlertSink,
    E: EventSink,
{
    let executor: edge_executor::LocalExecutor<'_, 1> = edge_executor::LocalExecutor::new();
    let task = executor.spawn(poll_loop(shared, stop, stopped, interval));
    futures_lite::future::block_on(executor.run(task));
}

/// Index and instant of the first tick on the `start + n * interval` grid
/// strictly after `now`, never earlier than tick `min_index`.
fn next_tick(start: Instant, interval: Duration, now: Instant, min_index: u64) -> (u64, Instant) {
    let elapsed = now.saturating_duration_since(start).as_nanos();
    let period = interval.as_nanos().max(1);
    let index = u64::try_from(elapsed / period + 1)
        .unwrap_or(u64::MAX)
        .max(min_index);
    let deadline = u32::try_from(index)
        .ok()
        .and_then(|n| interval.checked_mul(n))
        .and_then(|d| start.checked_add(d))
        .unwrap_or(now + interval);
    (index, deadline)
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    m.lock().map_err(|_| MonitorError::Poisoned)
}
