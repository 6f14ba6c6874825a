//! HTTP transport for the panel control service
//! This module defines the request/response surface the session core uses
//! to reach the control service, plus the reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::multipart;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::core::panel::commands::{PanelCommand, PanelMode};
use crate::core::panel::constants::{
    EP_BRIGHTNESS, EP_CONNECT, EP_DEVICE_INFO, EP_DISCONNECT, EP_HEALTH, EP_IMAGE, EP_MODE_CLOCK,
    EP_MODE_DIY, EP_MODE_RHYTHM, EP_MODE_RHYTHM2, EP_ORIENTATION, EP_PIXELS, EP_POWER, EP_SCAN,
    EP_SCAN_ALL, EP_STATUS, EP_TEXT, HTTP_TIMEOUT_SECS,
};
use crate::core::panel::error::{PanelError, Result};
use crate::core::panel::types::{DeviceCapabilities, DiscoveredDevice, SessionStatus};

/// Request/response operations of the control service.
///
/// The push channel is not part of this trait; see
/// [`crate::core::panel::channel::StatusSource`].
#[async_trait]
pub trait ControlTransport: Send + Sync {
    /// Probe the health endpoint.
    async fn health(&self) -> Result<()>;

    /// Run a discovery scan. `unfiltered` scans for all BLE devices instead
    /// of panels only.
    async fn discover(&self, unfiltered: bool) -> Result<Vec<DiscoveredDevice>>;

    /// Ask the service to connect to the device at `address`.
    async fn connect(&self, address: &str) -> Result<()>;

    /// Ask the service to drop the current device session.
    async fn disconnect(&self) -> Result<()>;

    /// Query the current connection status.
    async fn status(&self) -> Result<SessionStatus>;

    /// Fetch the connected panel's capability descriptor.
    async fn capabilities(&self) -> Result<DeviceCapabilities>;

    /// Forward one command to the connected panel.
    async fn dispatch(&self, command: &PanelCommand) -> Result<()>;
}

/// Error payload the control service attaches to non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// reqwest-backed [`ControlTransport`] talking to the local control service.
pub struct HttpControlClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpControlClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| PanelError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and turns non-success responses into
    /// [`PanelError::Rejected`] carrying the service's detail string.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| PanelError::Transport(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => format!("control service returned {status}"),
        };
        Err(PanelError::Rejected(detail))
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.send(self.http.get(self.url(path))).await?;
        response
            .json::<R>()
            .await
            .map_err(|e| PanelError::Transport(format!("malformed response: {e}")))
    }

    async fn post(&self, path: &str) -> Result<()> {
        debug!("POST {path}");
        self.send(self.http.post(self.url(path))).await.map(|_| ())
    }

    async fn post_json<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        debug!("POST {path}");
        self.send(self.http.post(self.url(path)).json(body))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ControlTransport for HttpControlClient {
    async fn health(&self) -> Result<()> {
        self.send(self.http.get(self.url(EP_HEALTH)))
            .await
            .map(|_| ())
            .map_err(PanelError::into_transport)
    }

    async fn discover(&self, unfiltered: bool) -> Result<Vec<DiscoveredDevice>> {
        let path = if unfiltered { EP_SCAN_ALL } else { EP_SCAN };
        self.get_json(path).await.map_err(PanelError::into_transport)
    }

    async fn connect(&self, address: &str) -> Result<()> {
        self.post_json(EP_CONNECT, &json!({ "address": address }))
            .await
            .map_err(PanelError::into_connection)
    }

    async fn disconnect(&self) -> Result<()> {
        self.post(EP_DISCONNECT)
            .await
            .map_err(PanelError::into_transport)
    }

    async fn status(&self) -> Result<SessionStatus> {
        self.get_json(EP_STATUS)
            .await
            .map_err(PanelError::into_transport)
    }

    async fn capabilities(&self) -> Result<DeviceCapabilities> {
        self.get_json(EP_DEVICE_INFO)
            .await
            .map_err(PanelError::into_transport)
    }

    async fn dispatch(&self, command: &PanelCommand) -> Result<()> {
        match command {
            PanelCommand::Text(options) => self.post_json(EP_TEXT, options).await,
            PanelCommand::Image(upload) => {
                let part = multipart::Part::bytes(upload.bytes.clone())
                    .file_name(upload.filename.clone());
                let form = multipart::Form::new().part("file", part);
                debug!("POST {EP_IMAGE} ({} bytes)", upload.bytes.len());
                self.send(self.http.post(self.url(EP_IMAGE)).multipart(form))
                    .await
                    .map(|_| ())
            }
            PanelCommand::Pixels { pixels } => {
                self.post_json(EP_PIXELS, &json!({ "pixels": pixels })).await
            }
            PanelCommand::Mode(mode) => match mode {
                PanelMode::Clock {
                    style,
                    format_24,
                    show_date,
                } => {
                    let body = json!({
                        "style": style,
                        "format_24": format_24,
                        "show_date": show_date,
                    });
                    self.post_json(EP_MODE_CLOCK, &body).await
                }
                PanelMode::Rhythm { style, levels } => {
                    self.post_json(EP_MODE_RHYTHM, &json!({ "style": style, "levels": levels }))
                        .await
                }
                PanelMode::Rhythm2 { style, time } => {
                    self.post_json(EP_MODE_RHYTHM2, &json!({ "style": style, "time": time }))
                        .await
                }
                PanelMode::Diy => self.post(EP_MODE_DIY).await,
            },
            PanelCommand::Brightness { level } => {
                self.post_json(EP_BRIGHTNESS, &json!({ "brightness": level }))
                    .await
            }
            PanelCommand::Orientation { orientation } => {
                self.post_json(EP_ORIENTATION, &json!({ "orientation": orientation }))
                    .await
            }
            PanelCommand::Power { on } => self.post_json(EP_POWER, &json!({ "on": on })).await,
        }
    }
}
