//! Session state store
//! Single source of truth for the one device session the application
//! maintains. Mutated only through the three methods below; every mutation
//! notifies subscribed observers synchronously, in subscription order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use log::{info, warn};

use crate::core::panel::types::{DeviceCapabilities, SessionStatus};

/// Snapshot of the session handed to observers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub capabilities: Option<DeviceCapabilities>,
}

/// Identifies one observer registration, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&SessionSnapshot) + Send + Sync>;

/// Holds the connection status and capability descriptor of the single
/// device session. No I/O happens here.
pub struct SessionStore {
    session: Mutex<SessionSnapshot>,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
    next_id: AtomicU64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            session: Mutex::new(SessionSnapshot {
                status: SessionStatus::disconnected(),
                capabilities: None,
            }),
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.lock_session().status.clone()
    }

    pub fn capabilities(&self) -> Option<DeviceCapabilities> {
        self.lock_session().capabilities.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock_session().clone()
    }

    /// Records a fully established connection: the connect call and the
    /// capability fetch both succeeded.
    pub fn mark_connected(&self, address: impl Into<String>, capabilities: DeviceCapabilities) {
        let snapshot = {
            let mut session = self.lock_session();
            session.status = SessionStatus::connected_to(address);
            session.capabilities = Some(capabilities);
            session.clone()
        };
        info!(
            "Session connected to {}",
            snapshot.status.address.as_deref().unwrap_or_default()
        );
        self.notify(&snapshot);
    }

    /// Records the end of the session, dropping the capability descriptor.
    pub fn mark_disconnected(&self) {
        let snapshot = {
            let mut session = self.lock_session();
            session.status = SessionStatus::disconnected();
            session.capabilities = None;
            session.clone()
        };
        info!("Session disconnected");
        self.notify(&snapshot);
    }

    /// Applies a status frame pushed by the control service.
    ///
    /// This is the push channel's sole write path and always wins over
    /// locally-assumed state. Frames are applied in receipt order, and an
    /// unchanged frame still notifies observers (keep-alive semantics).
    pub fn apply_remote_status(&self, remote: SessionStatus) {
        let snapshot = {
            let mut session = self.lock_session();
            let status = if remote.connected {
                // A connected frame may omit the address; keep the one we
                // already track rather than breaking the invariant.
                match remote.address.or_else(|| session.status.address.clone()) {
                    Some(address) => SessionStatus::connected_to(address),
                    None => {
                        warn!("Remote reported connected without an address, treating as disconnected");
                        SessionStatus::disconnected()
                    }
                }
            } else {
                SessionStatus::disconnected()
            };
            if !status.connected {
                session.capabilities = None;
            }
            session.status = status;
            session.clone()
        };
        self.notify(&snapshot);
    }

    /// Registers `observer` to run after every mutation. Delivery is
    /// synchronous and in registration order.
    pub fn subscribe(
        &self,
        observer: impl Fn(&SessionSnapshot) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_observers().push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock_observers().retain(|(other, _)| *other != id);
    }

    fn notify(&self, snapshot: &SessionSnapshot) {
        for (_, observer) in self.lock_observers().iter() {
            observer(snapshot);
        }
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, SessionSnapshot> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_observers(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Observer)>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
