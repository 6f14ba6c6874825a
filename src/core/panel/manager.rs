//! Panel session manager
//! This module provides the main interface for session operations: it ties
//! the transport, the session store, discovery and command dispatch
//! together and owns the connect/disconnect lifecycle.

use std::sync::Arc;

use log::{info, warn};

use crate::core::panel::client::ControlTransport;
use crate::core::panel::dispatcher::CommandDispatcher;
use crate::core::panel::error::{PanelError, Result};
use crate::core::panel::scanner::DiscoveryCoordinator;
use crate::core::panel::store::SessionStore;
use crate::core::panel::types::{DeviceCapabilities, SessionStatus};

/// Manages the single device session against the control service.
pub struct PanelManager<T: ControlTransport> {
    transport: Arc<T>,
    store: Arc<SessionStore>,
    scanner: DiscoveryCoordinator<T>,
    dispatcher: CommandDispatcher<T>,
}

impl<T: ControlTransport> PanelManager<T> {
    pub fn new(transport: Arc<T>) -> Self {
        let store = Arc::new(SessionStore::new());
        let scanner = DiscoveryCoordinator::new(transport.clone());
        let dispatcher = CommandDispatcher::new(store.clone(), transport.clone());
        Self {
            transport,
            store,
            scanner,
            dispatcher,
        }
    }

    pub fn store(&self) -> Arc<SessionStore> {
        self.store.clone()
    }

    pub fn scanner(&self) -> &DiscoveryCoordinator<T> {
        &self.scanner
    }

    pub fn dispatcher(&self) -> &CommandDispatcher<T> {
        &self.dispatcher
    }

    pub fn transport(&self) -> Arc<T> {
        self.transport.clone()
    }

    /// Connects to the device at `address`.
    ///
    /// Connect is all-or-nothing: the capability descriptor must be fetched
    /// before the session is declared connected. When the capability fetch
    /// fails after a successful connect, the remote session is torn down
    /// best-effort and the store rolls back to disconnected.
    pub async fn connect(&self, address: &str) -> Result<DeviceCapabilities> {
        if address.is_empty() {
            return Err(PanelError::Connection(
                "device address must not be empty".to_string(),
            ));
        }

        let current = self.store.status();
        if current.connected && current.address.as_deref() == Some(address) {
            if let Some(capabilities) = self.store.capabilities() {
                info!("Device {address} already connected");
                return Ok(capabilities);
            }
        }

        self.transport.connect(address).await?;

        match self.transport.capabilities().await {
            Ok(capabilities) => {
                self.store.mark_connected(address, capabilities.clone());
                info!(
                    "Connected to {address} ({}x{} panel)",
                    capabilities.width, capabilities.height
                );
                Ok(capabilities)
            }
            Err(e) => {
                warn!("Capability fetch failed after connect, rolling back: {e}");
                if let Err(e) = self.transport.disconnect().await {
                    warn!("Rollback disconnect failed: {e}");
                }
                self.store.mark_disconnected();
                Err(PanelError::Connection(format!(
                    "capability fetch failed: {e}"
                )))
            }
        }
    }

    /// Disconnects from the current device.
    ///
    /// Local state always transitions to disconnected once requested, even
    /// when the remote call fails; partial remote state must not block
    /// future connect attempts, and the push channel corrects any
    /// divergence. The remote error is still returned for the UI.
    pub async fn disconnect(&self) -> Result<()> {
        let result = self.transport.disconnect().await;
        if let Err(e) = &result {
            warn!("Disconnect reported an error, clearing local state anyway: {e}");
        }
        self.store.mark_disconnected();
        result
    }

    /// Queries the service's status once and applies it through the remote
    /// write path. Used at startup, before the first push frame arrives.
    pub async fn refresh_status(&self) -> Result<SessionStatus> {
        let status = self.transport.status().await?;
        self.store.apply_remote_status(status.clone());
        Ok(self.store.status())
    }
}
