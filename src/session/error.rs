use super::state::SessionStatus;
use thiserror::Error;

/// Errors surfaced by session control operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// Operation invoked in a state that forbids it. The UI should disable
    /// the control, but this check is the authoritative contract.
    #[error("{operation} is not allowed while the session is {status:?}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },

    /// The live connection could not be established. A failed start rolls
    /// the session back to idle with no retained handle.
    #[error("failed to open live connection")]
    Connection(#[source] anyhow::Error),

    /// The capture widget reports no usable media stream.
    #[error("media capture unavailable: {0}")]
    MediaUnavailable(String),
}
