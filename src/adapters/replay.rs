//! Host-side location sources.
//!
//! The monitor has no positioning hardware on a workstation, so the binary
//! and the tests feed it from these instead:
//!
//! - [`ReplayLocationSource`] replays a recorded track, one fix per cycle.
//! - [`FixedLocationSource`] always reports the same position.
//!
//! Track files hold one `latitude,longitude` pair per line; blank lines
//! and lines starting with `#` are skipped.

use std::path::Path;

use log::info;

use crate::app::ports::LocationSource;
use crate::error::LocationError;
use crate::geo::Coordinate;

/// Replays a fixed sequence of fixes.
#[derive(Debug, Clone)]
pub struct ReplayLocationSource {
    track: Vec<Coordinate>,
    next: usize,
    /// Wrap around at the end instead of reporting `NoFix`.
    looping: bool,
}

impl ReplayLocationSource {
    pub fn new(track: Vec<Coordinate>, looping: bool) -> Self {
        Self {
            track,
            next: 0,
            looping,
        }
    }

    /// Parse a track from text.
    pub fn parse(text: &str, looping: bool) -> Result<Self, LocationError> {
        let mut track = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            track.push(parse_fix(line).ok_or_else(|| {
                LocationError::Source(format!("track line {}: expected 'lat,lon', got '{}'", idx + 1, line))
            })?);
        }
        Ok(Self::new(track, looping))
    }

    /// Load a track file from disk.
    pub fn from_file(path: impl AsRef<Path>, looping: bool) -> Result<Self, LocationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LocationError::Source(format!("{}: {}", path.display(), e)))?;
        let source = Self::parse(&text, looping)?;
        info!("Replay track loaded: {} fixes from {}", source.len(), path.display());
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.track.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track.is_empty()
    }
}

impl LocationSource for ReplayLocationSource {
    fn current_position(&mut self) -> Result<Coordinate, LocationError> {
        if self.track.is_empty() {
            return Err(LocationError::NoFix);
        }
        if self.next >= self.track.len() {
            if !self.looping {
                return Err(LocationError::NoFix);
            }
            self.next = 0;
        }
        let fix = self.track[self.next];
        self.next += 1;
        Ok(fix)
    }
}

fn parse_fix(line: &str) -> Option<Coordinate> {
    let (lat, lon) = line.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    Coordinate::validated(lat, lon).ok()
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationSource(pub Coordinate);

impl LocationSource for FixedLocationSource {
    fn current_position(&mut self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}
