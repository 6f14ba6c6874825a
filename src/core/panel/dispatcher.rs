//! Command dispatcher
//! Gate between UI-issued commands and the control service: every command
//! is checked against the live session and validated locally before any
//! network call is made.

use std::sync::Arc;

use log::info;

use crate::core::panel::client::ControlTransport;
use crate::core::panel::commands::PanelCommand;
use crate::core::panel::error::{PanelError, Result};
use crate::core::panel::store::SessionStore;

/// Validates and forwards panel commands.
pub struct CommandDispatcher<T: ControlTransport> {
    store: Arc<SessionStore>,
    transport: Arc<T>,
}

impl<T: ControlTransport> CommandDispatcher<T> {
    pub fn new(store: Arc<SessionStore>, transport: Arc<T>) -> Self {
        Self { store, transport }
    }

    /// Submits one command to the connected panel.
    ///
    /// Fails with [`PanelError::NotConnected`] before any network call when
    /// no session is active, and with [`PanelError::InvalidCommand`] when
    /// local validation fails. No retry happens here: re-sending a
    /// physical-device side effect is the caller's decision.
    ///
    /// Successful settings commands (brightness, orientation, power) do not
    /// touch session state; only connect/disconnect and the push channel do.
    pub async fn submit(&self, command: &PanelCommand) -> Result<()> {
        if !self.store.status().connected {
            return Err(PanelError::NotConnected);
        }
        command.validate()?;

        info!("Dispatching {} command", command.family());
        self.transport.dispatch(command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::panel::testing::{FakeTransport, caps16};
    use std::sync::atomic::Ordering;

    fn connected_setup() -> (Arc<SessionStore>, Arc<FakeTransport>) {
        let store = Arc::new(SessionStore::new());
        store.mark_connected("AA:BB:CC", caps16());
        (store, Arc::new(FakeTransport::default()))
    }

    #[tokio::test]
    async fn submit_while_disconnected_never_reaches_the_transport() {
        let store = Arc::new(SessionStore::new());
        let transport = Arc::new(FakeTransport::default());
        let dispatcher = CommandDispatcher::new(store, transport.clone());

        let result = dispatcher
            .submit(&PanelCommand::Brightness { level: 50 })
            .await;

        assert!(matches!(result, Err(PanelError::NotConnected)));
        assert_eq!(transport.dispatch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn brightness_boundaries_are_enforced_locally() {
        let (store, transport) = connected_setup();
        let dispatcher = CommandDispatcher::new(store, transport.clone());

        for level in [0, 100] {
            dispatcher
                .submit(&PanelCommand::Brightness { level })
                .await
                .unwrap();
        }
        assert_eq!(transport.dispatch_calls.load(Ordering::SeqCst), 2);

        let result = dispatcher
            .submit(&PanelCommand::Brightness { level: 101 })
            .await;
        assert!(matches!(result, Err(PanelError::InvalidCommand(_))));
        // The invalid command never reached the transport.
        assert_eq!(transport.dispatch_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn remote_rejection_is_propagated_without_retry() {
        let (store, transport) = connected_setup();
        *transport.dispatch_error.lock().unwrap() =
            Some(PanelError::Rejected("hardware fault".to_string()));
        let dispatcher = CommandDispatcher::new(store, transport.clone());

        let result = dispatcher.submit(&PanelCommand::Power { on: true }).await;

        assert!(matches!(result, Err(PanelError::Rejected(_))));
        assert_eq!(transport.dispatch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn settings_commands_do_not_mutate_the_session() {
        let (store, transport) = connected_setup();
        let dispatcher = CommandDispatcher::new(store.clone(), transport);
        let before = store.snapshot();

        dispatcher
            .submit(&PanelCommand::Orientation { orientation: 2 })
            .await
            .unwrap();

        assert_eq!(store.snapshot(), before);
    }
}
