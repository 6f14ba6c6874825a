//! Panel session functionality
//! This module handles the device session against the local control
//! service: discovery, the connection lifecycle, command dispatch, and the
//! status push channel that keeps local state in sync with the device.

mod channel;
mod client;
mod commands;
mod constants;
mod dispatcher;
mod error;
mod manager;
mod scanner;
mod store;
mod supervisor;
#[cfg(test)]
pub(crate) mod testing;
mod types;

// Re-export types that should be publicly accessible
pub use channel::{StatusSink, StatusSource, WsStatusSource};
pub use client::{ControlTransport, HttpControlClient};
pub use commands::{ImageUpload, PanelCommand, PanelMode, Pixel, TextOptions};
pub use constants::*; // Re-export all constants
pub use dispatcher::CommandDispatcher;
pub use error::{PanelError, Result};
pub use manager::PanelManager;
pub use scanner::DiscoveryCoordinator;
pub use store::{SessionSnapshot, SessionStore, SubscriptionId};
pub use supervisor::{ReconnectPolicy, ReconnectSupervisor};
pub use types::{DeviceCapabilities, DiscoveredDevice, SessionStatus};
