//! Application configuration
//! Where the control service lives and how aggressively the status channel
//! reconnects. Persisted as JSON in the app config directory.

use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Manager};
use tokio::fs;

use crate::core::panel::{DEFAULT_BASE_URL, DEFAULT_WS_URL, RECONNECT_DELAY_MS, ReconnectPolicy};
use crate::utils::ensure_directory_exists;

const CONFIG_FILE_NAME: &str = "bridge_config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL of the control service REST API
    pub base_url: String,

    /// WebSocket URL of the status push channel
    pub ws_url: String,

    /// Delay before reopening a dropped status channel, in milliseconds
    pub reconnect_delay_ms: u64,

    /// Cap on status-channel reopen attempts. Absent means retry forever,
    /// which matches the panel's expected usage: the service runs locally
    /// and comes back whenever the user restarts it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconnect_max_attempts: Option<u32>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            reconnect_delay_ms: RECONNECT_DELAY_MS,
            reconnect_max_attempts: None,
        }
    }
}

impl BridgeConfig {
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            delay: Duration::from_millis(self.reconnect_delay_ms),
            max_attempts: self.reconnect_max_attempts,
        }
    }

    /// Loads the config from the app config directory, falling back to the
    /// defaults when no file exists yet.
    pub async fn load_config(app_handle: &AppHandle) -> Result<Self> {
        let config_dir = app_handle.path().app_config_dir()?;
        let file_path = config_dir.join(CONFIG_FILE_NAME);

        if !file_path.exists() {
            warn!("Config file not found at {:?}, using default.", file_path);
            return Ok(Self::default());
        }

        let config_json = fs::read_to_string(&file_path).await?;
        let config: Self = serde_json::from_str(&config_json)?;

        info!("Config loaded from {:?}", file_path);
        Ok(config)
    }

    /// Saves the current config to the app config directory.
    pub async fn save_config(&self, app_handle: &AppHandle) -> Result<()> {
        let config_dir = app_handle.path().app_config_dir()?;
        ensure_directory_exists(&config_dir).await?;

        let file_path = config_dir.join(CONFIG_FILE_NAME);
        let config_json = serde_json::to_string_pretty(&self)?;
        fs::write(&file_path, config_json).await?;

        info!("Config saved to {:?}", file_path);
        Ok(())
    }
}
