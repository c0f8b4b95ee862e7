//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to               |
//! |----------------|--------------------|---------------------------|
//! | `config_file`  | ConfigPort         | JSON file on disk         |
//! | `http_alert`   | AlertSink          | Email relay HTTP API      |
//! | `log_sink`     | EventSink          | `log` facade              |
//! |                | AlertSink          | `log` facade (fallback)   |
//! | `replay`       | LocationSource     | Recorded track / fixed fix|

pub mod config_file;
#[cfg(feature = "http-alert")]
pub mod http_alert;
pub mod log_sink;
pub mod replay;
