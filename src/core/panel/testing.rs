//! Test doubles shared by the session-core unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::core::panel::channel::{StatusSink, StatusSource};
use crate::core::panel::client::ControlTransport;
use crate::core::panel::commands::PanelCommand;
use crate::core::panel::error::{PanelError, Result};
use crate::core::panel::types::{DeviceCapabilities, DiscoveredDevice, SessionStatus};

pub(crate) fn caps16() -> DeviceCapabilities {
    DeviceCapabilities {
        width: 16,
        height: 16,
        device_type: 5,
        led_type: 1,
        has_wifi: false,
    }
}

pub(crate) fn device(name: &str, address: &str) -> DiscoveredDevice {
    DiscoveredDevice {
        name: name.to_string(),
        address: address.to_string(),
        rssi: Some(-60),
    }
}

/// Scriptable [`ControlTransport`] that records call counts.
#[derive(Default)]
pub(crate) struct FakeTransport {
    pub connect_error: Mutex<Option<PanelError>>,
    pub capabilities_error: Mutex<Option<PanelError>>,
    pub disconnect_error: Mutex<Option<PanelError>>,
    pub dispatch_error: Mutex<Option<PanelError>>,
    /// Consumed front-to-back, one entry per scan; empty list when drained.
    pub discover_results: Mutex<VecDeque<Result<Vec<DiscoveredDevice>>>>,
    /// When present, `discover` blocks until a permit is added.
    pub discover_gate: Option<Semaphore>,
    pub connect_calls: AtomicUsize,
    pub disconnect_calls: AtomicUsize,
    pub dispatch_calls: AtomicUsize,
}

impl FakeTransport {
    pub fn gated() -> Self {
        Self {
            discover_gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn push_scan(&self, result: Result<Vec<DiscoveredDevice>>) {
        self.discover_results.lock().unwrap().push_back(result);
    }

    pub fn release_scan(&self) {
        if let Some(gate) = &self.discover_gate {
            gate.add_permits(1);
        }
    }
}

#[async_trait]
impl ControlTransport for FakeTransport {
    async fn health(&self) -> Result<()> {
        Ok(())
    }

    async fn discover(&self, _unfiltered: bool) -> Result<Vec<DiscoveredDevice>> {
        if let Some(gate) = &self.discover_gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.discover_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn connect(&self, _address: &str) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        match self.connect_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        match self.disconnect_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn status(&self) -> Result<SessionStatus> {
        Ok(SessionStatus::disconnected())
    }

    async fn capabilities(&self) -> Result<DeviceCapabilities> {
        match self.capabilities_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(caps16()),
        }
    }

    async fn dispatch(&self, _command: &PanelCommand) -> Result<()> {
        self.dispatch_calls.fetch_add(1, Ordering::SeqCst);
        match self.dispatch_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// [`StatusSource`] that counts channel opens. The first `immediate_closes`
/// runs deliver their scripted frames and close right away; later runs stay
/// open forever.
pub(crate) struct FakeStatusSource {
    pub opens: AtomicUsize,
    pub frames: Mutex<VecDeque<SessionStatus>>,
    pub immediate_closes: usize,
}

impl FakeStatusSource {
    pub fn closing_once() -> Self {
        Self {
            opens: AtomicUsize::new(0),
            frames: Mutex::new(VecDeque::new()),
            immediate_closes: 1,
        }
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for FakeStatusSource {
    async fn run(&self, sink: StatusSink) -> Result<()> {
        let run = self.opens.fetch_add(1, Ordering::SeqCst) + 1;
        for frame in self.frames.lock().unwrap().drain(..) {
            sink(frame);
        }
        if run <= self.immediate_closes {
            Ok(())
        } else {
            std::future::pending().await
        }
    }
}
