//! Reconnection supervisor
//! Keeps the status push channel alive: when the channel closes without an
//! explicit teardown, it is reopened with the same sink after a fixed delay.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::panel::channel::{StatusSink, StatusSource};
use crate::core::panel::constants::RECONNECT_DELAY_MS;
use crate::core::panel::store::SessionStore;

/// Retry behaviour after the push channel drops.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    /// Fixed delay before each reopen attempt.
    pub delay: Duration,
    /// Cap on reopen attempts; `None` retries until teardown.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(RECONNECT_DELAY_MS),
            max_attempts: None,
        }
    }
}

/// Owns the status-channel task and its retry timer.
///
/// Only this component reopens the channel, and the only cancellable
/// long-lived operation in the system is its pending retry timer.
pub struct ReconnectSupervisor {
    cancel_token: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
}

impl Default for ReconnectSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconnectSupervisor {
    pub fn new() -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_handle: None,
        }
    }

    /// Starts supervising the channel. Frames are applied to `store` in
    /// receipt order via its remote-status write path.
    pub fn start(
        &mut self,
        source: Arc<dyn StatusSource>,
        store: Arc<SessionStore>,
        policy: ReconnectPolicy,
    ) {
        if self.task_handle.is_some() {
            warn!("Status channel supervision already running");
            return;
        }

        self.cancel_token = CancellationToken::new();
        let cancel_token = self.cancel_token.clone();
        let sink: StatusSink = Arc::new(move |status| store.apply_remote_status(status));

        let handle = tokio::spawn(async move {
            Self::supervise(source, sink, policy, cancel_token).await;
        });
        self.task_handle = Some(handle);
    }

    async fn supervise(
        source: Arc<dyn StatusSource>,
        sink: StatusSink,
        policy: ReconnectPolicy,
        cancel_token: CancellationToken,
    ) {
        let mut attempts: u32 = 0;
        loop {
            let outcome = tokio::select! {
                _ = cancel_token.cancelled() => break,
                outcome = source.run(sink.clone()) => outcome,
            };
            match outcome {
                Ok(()) => warn!("Status channel closed unexpectedly"),
                Err(e) => warn!("Status channel failed: {e}"),
            }

            attempts += 1;
            if let Some(max) = policy.max_attempts {
                if attempts > max {
                    warn!("Giving up on the status channel after {max} reopen attempts");
                    break;
                }
            }

            tokio::select! {
                _ = cancel_token.cancelled() => break,
                _ = tokio::time::sleep(policy.delay) => {}
            }
        }
        info!("Status channel supervision stopped");
    }

    /// Explicit teardown: cancels a pending reopen timer, closes the live
    /// channel, and waits for the task to finish. No dangling timers remain.
    pub async fn shutdown(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.task_handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Status channel task ended abnormally: {e}");
                }
            }
        }
    }
}
