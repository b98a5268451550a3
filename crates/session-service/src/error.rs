//! Session service error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to the reducer and consumers as `StatusAction::Error`.
///
/// Every variant is terminal for the operation that produced it and
/// non-fatal for the middleware, which keeps serving subsequent actions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionError {
    /// Persisting or removing identity material failed
    #[error("Failed to write to secure storage")]
    StorageWriteFailed,

    /// Reading the persisted identity failed (a clean miss is not an error)
    #[error("Failed to read from secure storage")]
    StorageReadFailed,

    /// Persisted identity material could not be decoded
    #[error("Stored credential could not be decoded")]
    CredentialDecodeFailed,

    /// The identity provider could not determine the credential state
    #[error("Unknown credential state")]
    UnknownCredentialState,
}

/// Identity provider failure.
///
/// Never leaves the provider boundary: the middleware normalizes it to
/// `CredentialState::Unknown` before mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network or IPC failure talking to the provider
    #[error("Provider transport error: {0}")]
    Transport(String),

    /// The provider did not answer in time
    #[error("Provider request timed out")]
    Timeout,

    /// The provider refused to answer for this user
    #[error("Provider rejected request: {0}")]
    Rejected(String),
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias using ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_serializes_snake_case() {
        let json = serde_json::to_string(&SessionError::StorageWriteFailed).unwrap();
        assert_eq!(json, "\"storage_write_failed\"");
    }

    #[test]
    fn test_session_error_display() {
        assert_eq!(
            SessionError::UnknownCredentialState.to_string(),
            "Unknown credential state"
        );
    }

    #[test]
    fn test_provider_error_display() {
        assert_eq!(
            ProviderError::Transport("connection reset".to_string()).to_string(),
            "Provider transport error: connection reset"
        );
    }
}
