use shared::domain::Employee;
use thiserror::Error;

/// Connectivity-specific save failure message, surfaced verbatim to the
/// rendering layer when the transport itself failed rather than the service.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - could not connect to server";

/// Initial dataset load failed. Blocking: the directory is unusable until a
/// full reload, so this escalates past the store into the top-level fallback.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// An edit save failed. Non-blocking: the session stays editable and the
/// original record is preserved so the caller can retry.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SaveError {
    pub message: String,
    pub record: Employee,
}

impl SaveError {
    pub fn new(message: impl Into<String>, record: Employee) -> Self {
        Self {
            message: message.into(),
            record,
        }
    }

    pub fn network(record: Employee) -> Self {
        Self::new(NETWORK_ERROR_MESSAGE, record)
    }

    pub fn is_network(&self) -> bool {
        self.message == NETWORK_ERROR_MESSAGE
    }
}
