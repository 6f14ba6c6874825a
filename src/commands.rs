//! Tauri commands
//! This module defines all the commands that can be invoked from the frontend.
//! Every failure comes back as a displayable string so the UI can show a
//! dismissable notification; none of these errors are fatal.

use tauri::State;

use crate::core::panel::{
    DeviceCapabilities, DiscoveredDevice, ImageUpload, PanelCommand, PanelMode, Pixel,
    SessionStatus, TextOptions,
};
use crate::state::AppState;

/// Scans for nearby panel devices
///
/// # Arguments
/// * `all` - When true, scan for every BLE device instead of panels only
/// * `app_state` - The application state
///
/// # Returns
/// The devices found by this scan; the previous result set is discarded.
#[tauri::command]
pub async fn scan_devices(
    all: Option<bool>,
    app_state: State<'_, AppState>,
) -> Result<Vec<DiscoveredDevice>, String> {
    app_state
        .manager
        .scanner()
        .scan(all.unwrap_or(false))
        .await
        .map_err(|e| e.to_string())
}

/// Connects to a panel device
///
/// # Arguments
/// * `address` - The hardware address of the device to connect to
/// * `app_state` - The application state
///
/// # Returns
/// The connected panel's capability descriptor (dimensions, hardware flags)
#[tauri::command]
pub async fn connect_to_device(
    address: String,
    app_state: State<'_, AppState>,
) -> Result<DeviceCapabilities, String> {
    app_state
        .manager
        .connect(&address)
        .await
        .map_err(|e| e.to_string())
}

/// Disconnects from the currently connected device
///
/// Local state clears even when the remote call fails.
#[tauri::command]
pub async fn disconnect(app_state: State<'_, AppState>) -> Result<(), String> {
    app_state.manager.disconnect().await.map_err(|e| e.to_string())
}

/// Returns the session status as currently tracked; no network call is made
#[tauri::command]
pub fn get_status(app_state: State<'_, AppState>) -> Result<SessionStatus, String> {
    Ok(app_state.manager.store().status())
}

/// Returns the connected panel's capability descriptor
#[tauri::command]
pub fn get_device_info(app_state: State<'_, AppState>) -> Result<DeviceCapabilities, String> {
    app_state
        .manager
        .store()
        .capabilities()
        .ok_or_else(|| "no device connected".to_string())
}

/// Sends scrolling text to the panel
#[tauri::command]
pub async fn send_text(
    options: TextOptions,
    app_state: State<'_, AppState>,
) -> Result<(), String> {
    submit(&app_state, PanelCommand::Text(options)).await
}

/// Uploads an image or GIF to the panel
///
/// The payload is opaque file data; decoding and resizing happen in the
/// control service.
#[tauri::command]
pub async fn send_image(
    filename: String,
    bytes: Vec<u8>,
    app_state: State<'_, AppState>,
) -> Result<(), String> {
    submit(&app_state, PanelCommand::Image(ImageUpload { filename, bytes })).await
}

/// Sends a batch of pixels for pixel-art drawing
#[tauri::command]
pub async fn send_pixels(
    pixels: Vec<Pixel>,
    app_state: State<'_, AppState>,
) -> Result<(), String> {
    submit(&app_state, PanelCommand::Pixels { pixels }).await
}

/// Activates one of the panel's built-in modes (clock, rhythm, DIY)
#[tauri::command]
pub async fn set_mode(mode: PanelMode, app_state: State<'_, AppState>) -> Result<(), String> {
    submit(&app_state, PanelCommand::Mode(mode)).await
}

/// Sets the panel brightness (0-100)
#[tauri::command]
pub async fn set_brightness(level: u8, app_state: State<'_, AppState>) -> Result<(), String> {
    submit(&app_state, PanelCommand::Brightness { level }).await
}

/// Sets the panel orientation (0-3, quarter turns)
#[tauri::command]
pub async fn set_orientation(
    orientation: u8,
    app_state: State<'_, AppState>,
) -> Result<(), String> {
    submit(&app_state, PanelCommand::Orientation { orientation }).await
}

/// Powers the panel on or off
#[tauri::command]
pub async fn set_power(on: bool, app_state: State<'_, AppState>) -> Result<(), String> {
    submit(&app_state, PanelCommand::Power { on }).await
}

async fn submit(app_state: &State<'_, AppState>, command: PanelCommand) -> Result<(), String> {
    app_state
        .manager
        .dispatcher()
        .submit(&command)
        .await
        .map_err(|e| e.to_string())
}
