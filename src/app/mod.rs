//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the geofence monitor:
//! sampling orchestration, exit detection and alert gating. All
//! interaction with positioning and notification happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without a GPS receiver or a mail relay.

pub mod events;
pub mod ports;
pub mod service;
