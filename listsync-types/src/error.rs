//! Error types for the listsync core.

use thiserror::Error;

/// Result type for fetches against a remote collection source.
pub type TransportResult<T> = Result<T, TransportError>;

/// A fetch against a remote collection source failed.
///
/// The feed loader and table view catch these at their boundary and keep
/// their last known good state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be decoded into records.
    #[error("decode error: {0}")]
    Decode(String),
}

impl TransportError {
    /// Returns the HTTP status if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// The caller broke the engine's contract. Never swallowed by the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// `set_search` was called with a field outside the searchable columns.
    #[error("unknown search field: {0}")]
    UnknownSearchField(String),

    /// A feed cannot page with zero records per page.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}
