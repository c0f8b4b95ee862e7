//! Geofence monitor — host entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  ReplayLocationSource   HttpAlertSink / LogAlertSink       │
//! │  (LocationSource)       (AlertSink)                        │
//! │  FileConfigStore        LogEventSink                       │
//! │  (ConfigPort)           (EventSink)                        │
//! │                                                            │
//! │  ──────────────── Port Trait Boundary ───────────────────  │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │          GeofenceMonitor (pure logic)                │  │
//! │  │  classify · exit detection · alert gating            │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                                                            │
//! │  Poller (timer thread) · stdin commands (check / quit)     │
//! └────────────────────────────────────────────────────────────┘
//! ```

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use geofence::adapters::config_file::FileConfigStore;
use geofence::adapters::log_sink::{LogAlertSink, LogEventSink};
use geofence::adapters::replay::ReplayLocationSource;
use geofence::app::ports::{AlertSink, ConfigPort};
use geofence::config::MonitorConfig;
use geofence::error::ConfigError;
use geofence::scheduler::{self, Monitored};
use geofence::GeofenceMonitor;

#[derive(Debug, Parser)]
#[command(name = "geofence-monitor", version, about = "Poll a position and alert when it leaves the safe zone")]
struct Cli {
    /// JSON config file; defaults are used when it does not exist
    #[arg(short, long, default_value = "geofence.json")]
    config: PathBuf,

    /// Track file with one `lat,lon` fix per line
    #[arg(short, long, required_unless_present = "test_mail")]
    track: Option<PathBuf>,

    /// Replay the track in a loop instead of stopping at its end
    #[arg(long = "loop")]
    repeat: bool,

    /// Override the poll interval (milliseconds)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Run a single check and exit
    #[arg(long)]
    once: bool,

    /// Ask the relay for a test mail, then exit
    #[arg(long)]
    test_mail: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    info!("GeoFence monitor v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Config (file or defaults) ──────────────────────────
    let store = FileConfigStore::new(&cli.config);
    let mut config = match store.load() {
        Ok(cfg) => cfg,
        Err(ConfigError::NotFound) => {
            warn!("{} not found, using defaults", cli.config.display());
            MonitorConfig::default()
        }
        Err(e) => return Err(e).with_context(|| format!("loading {}", cli.config.display())),
    };
    if let Some(ms) = cli.interval_ms {
        config.poll_interval_ms = ms;
    }
    config.validate().context("invalid configuration")?;

    if cli.test_mail {
        return send_test_mail(&config);
    }

    // ── 2. Adapters ───────────────────────────────────────────
    let track = cli.track.as_deref().context("--track is required")?;
    let location = ReplayLocationSource::from_file(track, cli.repeat)
        .with_context(|| format!("loading track {}", track.display()))?;
    let alerts = build_alert_sink(&config)?;
    let events = LogEventSink::new();

    // ── 3. Monitor ────────────────────────────────────────────
    let monitor = GeofenceMonitor::new(config.geofence()?);

    if cli.once {
        let mut m = Monitored::new(monitor, location, alerts, events);
        let sample = m.cycle()?;
        println!(
            "{} | {:.3}km from center | {}",
            sample.coordinate, sample.distance_km, sample.status
        );
        return Ok(());
    }

    let handle = scheduler::start(monitor, location, alerts, events, config.poll_interval())?;

    // ── 4. Command loop: Enter = check now, `q` or EOF = quit ─
    info!("Press Enter to check now, 'r' to re-authorize, 'q' to quit");
    for line in std::io::stdin().lock().lines() {
        match line?.trim() {
            "q" | "quit" => break,
            "r" => handle.reauthorize()?,
            _ => match handle.check_now() {
                Ok(s) => println!("{} | {:.3}km | {}", s.coordinate, s.distance_km, s.status),
                Err(e) => println!("check failed: {e}"),
            },
        }
    }

    let snap = handle.snapshot()?;
    handle.join();
    info!(
        "Exiting: {} cycles, {} alerts sent, {} failed, last status {}",
        snap.cycles,
        snap.alerts_sent,
        snap.alerts_failed,
        snap.visible_status()
    );
    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Warn
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[cfg(feature = "http-alert")]
fn build_alert_sink(config: &MonitorConfig) -> Result<Box<dyn AlertSink + Send>> {
    use geofence::adapters::http_alert::HttpAlertSink;

    match &config.alert_endpoint {
        Some(url) => {
            let sink = HttpAlertSink::new(url.as_str(), config.device_id.as_str(), config.alert_timeout())?;
            if let Err(e) = sink.ping() {
                warn!("Alert relay not reachable yet: {}", e);
            }
            Ok(Box::new(sink))
        }
        None => Ok(Box::new(LogAlertSink::new(config.device_id.as_str()))),
    }
}

#[cfg(not(feature = "http-alert"))]
fn build_alert_sink(config: &MonitorConfig) -> Result<Box<dyn AlertSink + Send>> {
    if config.alert_endpoint.is_some() {
        warn!("Built without http-alert; alerts will only be logged");
    }
    Ok(Box::new(LogAlertSink::new(config.device_id.as_str())))
}

#[cfg(feature = "http-alert")]
fn send_test_mail(config: &MonitorConfig) -> Result<()> {
    use geofence::adapters::http_alert::HttpAlertSink;

    let url = config
        .alert_endpoint
        .as_deref()
        .context("--test-mail needs alert_endpoint in the config")?;
    HttpAlertSink::new(url, config.device_id.as_str(), config.alert_timeout())?.send_test()?;
    println!("Test mail sent via {url}");
    Ok(())
}

#[cfg(not(feature = "http-alert"))]
fn send_test_mail(_config: &MonitorConfig) -> Result<()> {
    anyhow::bail!("--test-mail requires the http-alert feature")
}
