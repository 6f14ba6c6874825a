//! Constants used throughout the application
//! This module contains all the constant values used in the application,
//! such as control-service endpoints, timeouts, and retry policy values.

/// Default base URL of the local control service
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default WebSocket endpoint delivering status frames
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8000/ws";

/// Health check endpoint
pub const EP_HEALTH: &str = "/";

/// Discovery endpoints
pub const EP_SCAN: &str = "/devices/scan";
pub const EP_SCAN_ALL: &str = "/devices/scan/all";

/// Session lifecycle endpoints
pub const EP_CONNECT: &str = "/devices/connect";
pub const EP_DISCONNECT: &str = "/devices/disconnect";
pub const EP_STATUS: &str = "/devices/status";
pub const EP_DEVICE_INFO: &str = "/panel/device-info";

/// Command endpoints, one per command family
pub const EP_TEXT: &str = "/panel/text";
pub const EP_IMAGE: &str = "/panel/image";
pub const EP_PIXELS: &str = "/panel/pixels";
pub const EP_BRIGHTNESS: &str = "/panel/brightness";
pub const EP_ORIENTATION: &str = "/panel/orientation";
pub const EP_POWER: &str = "/panel/power";
pub const EP_MODE_CLOCK: &str = "/panel/mode/clock";
pub const EP_MODE_RHYTHM: &str = "/panel/mode/rhythm";
pub const EP_MODE_RHYTHM2: &str = "/panel/mode/rhythm2";
pub const EP_MODE_DIY: &str = "/panel/mode/diy";

/// Delay before reopening a dropped status channel, in milliseconds
pub const RECONNECT_DELAY_MS: u64 = 3_000;

/// HTTP request timeout in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum health-check attempts while the control service boots
pub const MAX_HEALTH_RETRIES: u32 = 20;

/// Delay between health-check attempts in milliseconds
pub const HEALTH_RETRY_DELAY_MS: u64 = 500;
