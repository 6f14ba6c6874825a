//! iPixel Studio library
//! This is the main library for the iPixel Studio application: a desktop
//! control panel for iPixel Color BLE LED matrix displays, talking to the
//! bundled control service over HTTP and a WebSocket status channel.

// Module declarations
pub mod backend;
pub mod commands;
pub mod config;
pub mod core;
pub mod logging;
pub mod state;
pub mod utils;

use std::sync::Arc;

use log::{error, info, warn};
use tauri::{Emitter, Manager};

use backend::{BackendProcess, wait_for_backend};
use commands::{
    connect_to_device, disconnect, get_device_info, get_status, scan_devices, send_image,
    send_pixels, send_text, set_brightness, set_mode, set_orientation, set_power,
};
use config::BridgeConfig;
use crate::core::panel::WsStatusSource;
use logging::TauriLogger;
use state::AppState;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let mut builder = tauri::Builder::default().plugin(tauri_plugin_opener::init());

    // One UI process per machine; the control service allows a single
    // device session anyway.
    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    {
        builder = builder.plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            if let Some(window) = app.get_webview_window("main") {
                let _ = window.show();
                let _ = window.set_focus();
            }
        }));
    }

    builder
        // Register our commands
        .invoke_handler(tauri::generate_handler![
            scan_devices,
            connect_to_device,
            disconnect,
            get_status,
            get_device_info,
            send_text,
            send_image,
            send_pixels,
            set_mode,
            set_brightness,
            set_orientation,
            set_power
        ])
        // Setup our application state
        .setup(|app| {
            if TauriLogger::init(app.handle().clone(), log::Level::Info).is_err() {
                // Fall back to env_logger when the Tauri logger cannot be
                // installed (e.g. a logger is already set in tests).
                env_logger::builder()
                    .filter_level(log::LevelFilter::Info)
                    .init();
            }

            let config = tauri::async_runtime::block_on(BridgeConfig::load_config(app.handle()))
                .unwrap_or_else(|e| {
                    warn!("Failed to load config, using defaults: {e}");
                    BridgeConfig::default()
                });

            // Start the bundled control service. A developer running the
            // service by hand gets a warning, not a startup failure.
            match BackendProcess::spawn(app.handle()) {
                Ok(process) => {
                    app.manage(process);
                }
                Err(e) => {
                    warn!("Control service not started: {e}; assuming an external instance");
                }
            }

            let app_state = AppState::new(config)?;
            app.manage(app_state);

            let state = app.state::<AppState>();
            let manager = state.get_manager_arc();
            let store = manager.store();
            let supervisor = state.supervisor.clone();
            let ws_url = state.config.ws_url.clone();
            let policy = state.config.reconnect_policy();

            // Mirror every session mutation to the frontend.
            let ui = app.handle().clone();
            store.subscribe(move |snapshot| {
                if let Err(e) = ui.emit("session-update", snapshot.clone()) {
                    error!("Failed to emit session-update event: {e}");
                }
            });

            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                if let Err(e) = wait_for_backend(manager.transport().as_ref()).await {
                    error!("{e}");
                } else if let Err(e) = handle.emit("backend-ready", ()) {
                    error!("Failed to emit backend-ready event: {e}");
                }

                supervisor
                    .lock()
                    .await
                    .start(Arc::new(WsStatusSource::new(ws_url)), store, policy);

                // Seed local state before the first push frame arrives.
                if let Err(e) = manager.refresh_status().await {
                    warn!("Initial status query failed: {e}");
                }
            });

            Ok(())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                info!("Main window destroyed, tearing down");
                if let Some(state) = window.try_state::<AppState>() {
                    let supervisor = state.supervisor.clone();
                    tauri::async_runtime::block_on(async move {
                        supervisor.lock().await.shutdown().await;
                    });
                }
                if let Some(process) = window.try_state::<BackendProcess>() {
                    process.stop();
                }
            }
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
