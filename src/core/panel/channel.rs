//! Status push channel
//! This module handles the persistent notification stream from the control
//! service. Every frame is delivered to the sink in receipt order, with no
//! coalescing: an unchanged frame is a valid keep-alive signal.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use log::{info, warn};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;

use crate::core::panel::error::{PanelError, Result};
use crate::core::panel::types::SessionStatus;

/// Callback invoked for every status frame received.
pub type StatusSink = Arc<dyn Fn(SessionStatus) + Send + Sync>;

/// A source of status frames.
///
/// `run` resolves only when the channel closes: `Ok` for an orderly close,
/// `Err` when the channel could not be opened or failed mid-stream.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn run(&self, sink: StatusSink) -> Result<()>;
}

/// WebSocket-backed status source.
pub struct WsStatusSource {
    url: String,
}

impl WsStatusSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl StatusSource for WsStatusSource {
    async fn run(&self, sink: StatusSink) -> Result<()> {
        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| PanelError::Transport(e.to_string()))?;
        info!("Status channel open at {}", self.url);

        let (_, mut frames) = stream.split();
        while let Some(message) = frames.next().await {
            match message {
                Ok(WsMessage::Text(payload)) => {
                    match serde_json::from_str::<SessionStatus>(payload.as_str()) {
                        Ok(status) => sink(status),
                        Err(e) => warn!("Ignoring malformed status frame: {e}"),
                    }
                }
                Ok(WsMessage::Close(_)) => {
                    info!("Status channel closed by the control service");
                    break;
                }
                Ok(_) => {}
                Err(e) => return Err(PanelError::Transport(e.to_string())),
            }
        }
        Ok(())
    }
}
