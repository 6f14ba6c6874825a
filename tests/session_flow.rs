//! End-to-end session flow against a mock control service.

use std::sync::Arc;

use ipixel_studio_lib::core::panel::{
    HttpControlClient, PanelCommand, PanelError, PanelManager, SessionStatus,
};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn discover_connect_command_then_remote_disconnect() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/devices/scan")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name":"Panel-1","address":"11:22:33","rssi":-60}]"#)
        .create_async()
        .await;
    server
        .mock("POST", "/devices/connect")
        .match_body(Matcher::Json(json!({ "address": "11:22:33" })))
        .with_status(200)
        .with_body(r#"{"status":"connected","address":"11:22:33"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/panel/device-info")
        .with_status(200)
        .with_body(r#"{"width":16,"height":16,"device_type":5,"led_type":1,"has_wifi":false}"#)
        .create_async()
        .await;
    let brightness = server
        .mock("POST", "/panel/brightness")
        .match_body(Matcher::Json(json!({ "brightness": 50 })))
        .with_status(200)
        .with_body(r#"{"status":"success","brightness":50}"#)
        .expect(1)
        .create_async()
        .await;

    let transport = Arc::new(HttpControlClient::new(server.url()).unwrap());
    let manager = PanelManager::new(transport);

    let devices = manager.scanner().scan(false).await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "Panel-1");
    assert_eq!(devices[0].rssi, Some(-60));

    let capabilities = manager.connect(&devices[0].address).await.unwrap();
    assert_eq!((capabilities.width, capabilities.height), (16, 16));
    assert!(manager.store().status().connected);

    manager
        .dispatcher()
        .submit(&PanelCommand::Brightness { level: 50 })
        .await
        .unwrap();

    // An externally-triggered disconnect arrives through the push path and
    // overrides the locally-assumed state.
    manager
        .store()
        .apply_remote_status(SessionStatus::disconnected());

    let result = manager
        .dispatcher()
        .submit(&PanelCommand::Brightness { level: 60 })
        .await;
    assert!(matches!(result, Err(PanelError::NotConnected)));

    // Exactly one brightness request reached the service.
    brightness.assert_async().await;
}

#[tokio::test]
async fn capability_fetch_failure_rolls_back_over_http() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/devices/connect")
        .with_status(200)
        .with_body(r#"{"status":"connected","address":"AA:BB:CC"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/panel/device-info")
        .with_status(500)
        .with_body(r#"{"detail":"Failed to get device info: read timeout"}"#)
        .create_async()
        .await;
    let rollback = server
        .mock("POST", "/devices/disconnect")
        .with_status(200)
        .with_body(r#"{"status":"disconnected"}"#)
        .expect(1)
        .create_async()
        .await;

    let transport = Arc::new(HttpControlClient::new(server.url()).unwrap());
    let manager = PanelManager::new(transport);

    let result = manager.connect("AA:BB:CC").await;
    assert!(matches!(result, Err(PanelError::Connection(_))));
    assert!(!manager.store().status().connected);
    assert!(manager.store().capabilities().is_none());
    rollback.assert_async().await;
}
