//! HTTP alert relay adapter.
//!
//! Implements [`AlertSink`] against the email relay's JSON API:
//!
//! | Route              | Purpose                                  |
//! |--------------------|------------------------------------------|
//! | `POST /send-alert` | `{latitude, longitude, deviceId}` → mail |
//! | `GET /test-mail`   | one synthetic alert, for smoke tests     |
//! | `GET /`            | liveness probe                           |
//!
//! Every route answers `{"ok": true, ...}` on success and HTTP 500 with
//! `{"ok": false, "error": "..."}` when the relay fails to deliver. This
//! adapter does not retry.

use core::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app::ports::AlertSink;
use crate::error::AlertError;
use crate::fence::SampleResult;

/// Request body for `POST /send-alert`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest<'a> {
    pub latitude: f64,
    pub longitude: f64,
    pub device_id: &'a str,
}

/// Response body shared by every relay route.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelayResponse {
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Blocking HTTP client for the alert relay.
pub struct HttpAlertSink {
    client: reqwest::blocking::Client,
    base_url: String,
    device_id: String,
}

impl HttpAlertSink {
    pub fn new(
        base_url: impl Into<String>,
        device_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AlertError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AlertError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("HttpAlertSink: relay at {}", base_url);
        Ok(Self {
            client,
            base_url,
            device_id: device_id.into(),
        })
    }

    /// `GET /` — check that the relay is up.
    pub fn ping(&self) -> Result<(), AlertError> {
        let resp = self
            .client
            .get(self.url("/"))
            .send()
            .map_err(|e| AlertError::Transport(e.to_string()))?;
        check_response(resp).map(|_| ())
    }

    /// `GET /test-mail` — ask the relay to send one synthetic alert,
    /// independent of geofence state.
    pub fn send_test(&self) -> Result<(), AlertError> {
        let resp = self
            .client
            .get(self.url("/test-mail"))
            .send()
            .map_err(|e| AlertError::Transport(e.to_string()))?;
        let body = check_response(resp)?;
        info!(
            "Relay test mail: {}",
            body.message.as_deref().unwrap_or("sent")
        );
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl AlertSink for HttpAlertSink {
    fn notify(&mut self, sample: &SampleResult) -> Result<(), AlertError> {
        let body = AlertRequest {
            latitude: sample.coordinate.latitude,
            longitude: sample.coordinate.longitude,
            device_id: &self.device_id,
        };
        debug!("POST {}/send-alert {:?}", self.base_url, body);
        let resp = self
            .client
            .post(self.url("/send-alert"))
            .json(&body)
            .send()
            .map_err(|e| AlertError::Transport(e.to_string()))?;
        check_response(resp).map(|_| ())
    }
}

fn check_response(resp: reqwest::blocking::Response) -> Result<RelayResponse, AlertError> {
    let status = resp.status();
    let text = resp
        .text()
        .map_err(|e| AlertError::Transport(e.to_string()))?;
    interpret(status.as_u16(), &text)
}

/// Map a relay reply to success or [`AlertError::Rejected`].
fn interpret(status: u16, body: &str) -> Result<RelayResponse, AlertError> {
    let parsed: Option<RelayResponse> = serde_json::from_str(body).ok();
    match parsed {
        Some(r) if (200..300).contains(&status) && r.ok => Ok(r),
        Some(r) => Err(AlertError::Rejected {
            status,
            message: r.error.unwrap_or_else(|| "relay reported ok=false".to_string()),
        }),
        None => Err(AlertError::Rejected {
            status,
            message: format!("unexpected relay response: {}", body.chars().take(120).collect::<String>()),
        }),
    }
}
