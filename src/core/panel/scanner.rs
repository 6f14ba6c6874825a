//! Device discovery
//! Runs discovery scans against the control service, guards against
//! concurrent scans, and keeps the latest result set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::{info, warn};

use crate::core::panel::client::ControlTransport;
use crate::core::panel::error::{PanelError, Result};
use crate::core::panel::types::DiscoveredDevice;

/// Coordinates discovery scans: Idle -> Scanning -> Idle.
///
/// No timeout is imposed here; a stuck remote scan keeps the coordinator in
/// Scanning until the control service resolves it.
pub struct DiscoveryCoordinator<T: ControlTransport> {
    transport: Arc<T>,
    scanning: AtomicBool,
    devices: Mutex<Vec<DiscoveredDevice>>,
}

impl<T: ControlTransport> DiscoveryCoordinator<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            scanning: AtomicBool::new(false),
            devices: Mutex::new(Vec::new()),
        }
    }

    /// Runs one scan and returns the discovered devices.
    ///
    /// Fails with [`PanelError::ScanInProgress`] while a scan is running.
    /// On completion the previous result set is replaced wholesale; a device
    /// absent from the latest scan is presumed out of range. A failed scan
    /// leaves an empty list and returns the transport error for the UI.
    pub async fn scan(&self, unfiltered: bool) -> Result<Vec<DiscoveredDevice>> {
        if self.scanning.swap(true, Ordering::SeqCst) {
            return Err(PanelError::ScanInProgress);
        }

        info!("Starting device scan (unfiltered: {unfiltered})");
        let result = self.transport.discover(unfiltered).await;

        let found = match &result {
            Ok(devices) => {
                info!("Scan finished, {} device(s) found", devices.len());
                devices.clone()
            }
            Err(error) => {
                warn!("Scan failed: {error}");
                Vec::new()
            }
        };
        *self.lock_devices() = found;

        self.scanning.store(false, Ordering::SeqCst);
        result
    }

    /// The result set of the most recent completed scan.
    pub fn devices(&self) -> Vec<DiscoveredDevice> {
        self.lock_devices().clone()
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::SeqCst)
    }

    fn lock_devices(&self) -> std::sync::MutexGuard<'_, Vec<DiscoveredDevice>> {
        self.devices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::panel::testing::{FakeTransport, device};

    #[tokio::test]
    async fn second_scan_while_first_is_pending_is_rejected() {
        let transport = Arc::new(FakeTransport::gated());
        transport.push_scan(Ok(vec![device("Panel-1", "11:22:33")]));
        transport.push_scan(Ok(vec![device("Panel-2", "44:55:66")]));
        let coordinator = Arc::new(DiscoveryCoordinator::new(transport.clone()));

        let first = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.scan(false).await })
        };
        for _ in 0..10 {
            if coordinator.is_scanning() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(coordinator.is_scanning());

        assert!(matches!(
            coordinator.scan(false).await,
            Err(PanelError::ScanInProgress)
        ));

        transport.release_scan();
        let found = first.await.unwrap().unwrap();
        assert_eq!(found[0].address, "11:22:33");

        // After the first resolves, a third call succeeds and the result
        // set is exactly the latest scan's.
        transport.release_scan();
        let latest = coordinator.scan(false).await.unwrap();
        assert_eq!(latest, coordinator.devices());
        assert_eq!(coordinator.devices()[0].address, "44:55:66");
    }

    #[tokio::test]
    async fn each_scan_replaces_the_previous_result_set() {
        let transport = Arc::new(FakeTransport::default());
        transport.push_scan(Ok(vec![
            device("Panel-1", "11:22:33"),
            device("Panel-2", "44:55:66"),
        ]));
        transport.push_scan(Ok(vec![device("Panel-2", "44:55:66")]));
        let coordinator = DiscoveryCoordinator::new(transport);

        coordinator.scan(false).await.unwrap();
        assert_eq!(coordinator.devices().len(), 2);

        coordinator.scan(false).await.unwrap();
        let devices = coordinator.devices();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].address, "44:55:66");
    }

    #[tokio::test]
    async fn failed_scan_clears_the_list_and_surfaces_the_error() {
        let transport = Arc::new(FakeTransport::default());
        transport.push_scan(Ok(vec![device("Panel-1", "11:22:33")]));
        transport.push_scan(Err(PanelError::Transport("service down".to_string())));
        let coordinator = DiscoveryCoordinator::new(transport);

        coordinator.scan(false).await.unwrap();
        assert_eq!(coordinator.devices().len(), 1);

        assert!(matches!(
            coordinator.scan(false).await,
            Err(PanelError::Transport(_))
        ));
        assert!(coordinator.devices().is_empty());
        // The coordinator is Idle again after a failure.
        assert!(!coordinator.is_scanning());
    }
}
