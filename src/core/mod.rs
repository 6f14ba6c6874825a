//! Core functionality for iPixel Studio
//! This module contains the device-session core shared by the Tauri
//! command surface and the application shell.

pub mod panel;

// Re-export commonly used types
pub use panel::{PanelManager, SessionStore};
