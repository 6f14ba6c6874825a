//! Control service process lifecycle
//! The BLE control service ships as a bundled executable; this module
//! starts it from the app resource directory, waits for its health
//! endpoint, and kills it again on shutdown.

use std::process::{Child, Command};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{error, info, warn};
use tauri::{AppHandle, Manager, Runtime};

use crate::core::panel::{ControlTransport, HEALTH_RETRY_DELAY_MS, MAX_HEALTH_RETRIES};

/// Handle on the spawned control service process.
pub struct BackendProcess(Mutex<Option<Child>>);

impl BackendProcess {
    /// Starts the bundled control service executable from the resources
    /// directory.
    pub fn spawn<R: Runtime>(app: &AppHandle<R>) -> Result<Self> {
        let resource_dir = app
            .path()
            .resource_dir()
            .map_err(|e| anyhow!("failed to resolve resource directory: {e}"))?;

        let backend_name = if cfg!(windows) {
            "resources/backend.exe"
        } else {
            "resources/backend"
        };
        let backend_path = resource_dir.join(backend_name);

        if !backend_path.exists() {
            return Err(anyhow!(
                "control service executable not found at {}",
                backend_path.display()
            ));
        }

        info!("Starting control service from {}", backend_path.display());
        let child = Command::new(&backend_path)
            .spawn()
            .map_err(|e| anyhow!("failed to spawn control service: {e}"))?;
        info!("Control service started with PID {:?}", child.id());

        Ok(Self(Mutex::new(Some(child))))
    }

    /// Kills the process if it is still ours to kill.
    pub fn stop(&self) {
        let mut child_slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut child) = child_slot.take() {
            info!("Stopping control service...");
            match child.kill() {
                Ok(_) => info!("Control service terminated"),
                Err(e) => error!("Failed to kill control service: {e}"),
            }
        }
    }
}

/// Polls the health endpoint until the control service answers.
pub async fn wait_for_backend<T: ControlTransport>(transport: &T) -> Result<()> {
    for attempt in 1..=MAX_HEALTH_RETRIES {
        match transport.health().await {
            Ok(()) => {
                info!("Control service is ready");
                return Ok(());
            }
            Err(e) => {
                if attempt == MAX_HEALTH_RETRIES {
                    return Err(anyhow!(
                        "control service failed to start after {MAX_HEALTH_RETRIES} attempts: {e}"
                    ));
                }
                warn!("Attempt {attempt}/{MAX_HEALTH_RETRIES}: control service not ready yet");
                tokio::time::sleep(Duration::from_millis(HEALTH_RETRY_DELAY_MS)).await;
            }
        }
    }

    Err(anyhow!("control service startup timeout"))
}
