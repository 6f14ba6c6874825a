//! Application state management
//! This module defines and manages the global application state.

use std::sync::Arc;

use anyhow::Result;
use log::info;
use tokio::sync::Mutex;

use crate::config::BridgeConfig;
use crate::core::panel::{HttpControlClient, PanelManager, ReconnectSupervisor};

/// Global application state
pub struct AppState {
    /// The panel session manager instance
    pub manager: Arc<PanelManager<HttpControlClient>>,
    /// Supervisor for the status push channel
    pub supervisor: Arc<Mutex<ReconnectSupervisor>>,
    /// Effective configuration for this run
    pub config: BridgeConfig,
}

impl AppState {
    /// Creates a new AppState instance
    pub fn new(config: BridgeConfig) -> Result<Self> {
        info!("Initializing PanelManager against {}", config.base_url);
        let transport = Arc::new(HttpControlClient::new(config.base_url.clone())?);
        let manager = Arc::new(PanelManager::new(transport));
        Ok(Self {
            manager,
            supervisor: Arc::new(Mutex::new(ReconnectSupervisor::new())),
            config,
        })
    }

    /// Gets a reference to the panel manager
    pub fn get_manager_arc(&self) -> Arc<PanelManager<HttpControlClient>> {
        self.manager.clone()
    }
}
