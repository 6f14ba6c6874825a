//! Error taxonomy for panel session operations.
//! Every failure a user-initiated action can produce maps to one of these
//! variants; all of them are recoverable at the UI boundary.

use thiserror::Error;

/// Failures surfaced by the panel session core.
#[derive(Debug, Clone, Error)]
pub enum PanelError {
    /// A command was submitted without an active device session.
    /// Raised locally; the control service is never called.
    #[error("no device connected")]
    NotConnected,

    /// A command failed local validation before dispatch.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The control service is unreachable or returned a malformed response.
    #[error("control service error: {0}")]
    Transport(String),

    /// Connecting to a device failed, including a capability fetch failing
    /// after the connect itself succeeded.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The control service accepted the request but the device or its
    /// protocol layer rejected the command.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// A discovery scan was requested while one is still running.
    #[error("a scan is already in progress")]
    ScanInProgress,
}

impl PanelError {
    /// Re-classify a transport-level failure as a connect failure.
    pub(crate) fn into_connection(self) -> Self {
        match self {
            PanelError::Transport(detail) | PanelError::Rejected(detail) => {
                PanelError::Connection(detail)
            }
            other => other,
        }
    }

    /// Re-classify a remote rejection as a plain transport failure, for
    /// operations that have no rejection semantics of their own.
    pub(crate) fn into_transport(self) -> Self {
        match self {
            PanelError::Rejected(detail) => PanelError::Transport(detail),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, PanelError>;
