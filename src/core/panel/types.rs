//! Defines shared data structures for the panel session.

use serde::{Deserialize, Serialize};

/// Represents a panel advertised during a discovery scan.
///
/// Discovered devices only live within one scan's result set; each new scan
/// replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    /// The advertised device name
    pub name: String,
    /// The device address (MAC address on most platforms)
    pub address: String,
    /// The signal strength (RSSI) of the device, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i16>,
}

/// Connection status of the single device session.
///
/// `address` is present exactly when `connected` is true; the store keeps
/// that invariant across every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub connected: bool,
    #[serde(rename = "device_address", default)]
    pub address: Option<String>,
}

impl SessionStatus {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            address: None,
        }
    }

    pub fn connected_to(address: impl Into<String>) -> Self {
        Self {
            connected: true,
            address: Some(address.into()),
        }
    }
}

/// Static panel metadata, fetched once per successful connection and held
/// for the connection's duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    /// Pixel grid width
    pub width: u16,
    /// Pixel grid height
    pub height: u16,
    /// Hardware device-type code
    pub device_type: u8,
    /// LED technology code
    pub led_type: u8,
    /// Whether the panel also exposes a wifi interface
    pub has_wifi: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_frame_uses_service_field_names() {
        let frame: SessionStatus = serde_json::from_str(
            r#"{"type":"status","connected":true,"device_address":"11:22:33:44:55:66"}"#,
        )
        .unwrap();
        assert!(frame.connected);
        assert_eq!(frame.address.as_deref(), Some("11:22:33:44:55:66"));
    }

    #[test]
    fn disconnected_frame_may_omit_address() {
        let frame: SessionStatus =
            serde_json::from_str(r#"{"type":"status","connected":false}"#).unwrap();
        assert_eq!(frame, SessionStatus::disconnected());
    }

    #[test]
    fn device_list_parses_with_optional_rssi() {
        let devices: Vec<DiscoveredDevice> = serde_json::from_str(
            r#"[{"name":"Panel-1","address":"11:22:33","rssi":-60},
                {"name":"Panel-2","address":"44:55:66"}]"#,
        )
        .unwrap();
        assert_eq!(devices[0].rssi, Some(-60));
        assert_eq!(devices[1].rssi, None);
    }

    #[test]
    fn capabilities_parse_device_info_response() {
        let caps: DeviceCapabilities = serde_json::from_str(
            r#"{"width":16,"height":16,"device_type":5,"led_type":1,"has_wifi":false}"#,
        )
        .unwrap();
        assert_eq!((caps.width, caps.height), (16, 16));
        assert!(!caps.has_wifi);
    }
}
