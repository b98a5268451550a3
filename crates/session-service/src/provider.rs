//! Identity provider contract.

use crate::{ProviderError, SessionError, StatusAction};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The provider's verdict on a user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialState {
    Authorized,
    Revoked,
    NotFound,
    Unknown,
}

impl CredentialState {
    /// Collapse a provider result, turning any failure into `Unknown`.
    pub fn normalize(result: Result<CredentialState, ProviderError>) -> CredentialState {
        match result {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Credential state query failed");
                CredentialState::Unknown
            }
        }
    }

    /// The Status action a verification completing with this state produces.
    pub fn into_status(self) -> StatusAction {
        match self {
            CredentialState::Authorized => StatusAction::Valid,
            CredentialState::Revoked => StatusAction::Terminated,
            CredentialState::NotFound => StatusAction::Undefined,
            CredentialState::Unknown => StatusAction::Error(SessionError::UnknownCredentialState),
        }
    }
}

/// External identity provider.
///
/// Implementations must complete every call exactly once and must not block
/// the calling task while waiting on the network.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn credential_state(&self, user_id: &str) -> Result<CredentialState, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_state_mapping() {
        assert_eq!(CredentialState::Authorized.into_status(), StatusAction::Valid);
        assert_eq!(CredentialState::Revoked.into_status(), StatusAction::Terminated);
        assert_eq!(CredentialState::NotFound.into_status(), StatusAction::Undefined);
        assert_eq!(
            CredentialState::Unknown.into_status(),
            StatusAction::Error(SessionError::UnknownCredentialState)
        );
    }

    #[test]
    fn test_normalize_provider_errors() {
        assert_eq!(
            CredentialState::normalize(Ok(CredentialState::Revoked)),
            CredentialState::Revoked
        );
        assert_eq!(
            CredentialState::normalize(Err(ProviderError::Timeout)),
            CredentialState::Unknown
        );
        assert_eq!(
            CredentialState::normalize(Err(ProviderError::Transport("reset".to_string()))),
            CredentialState::Unknown
        );
    }
}
