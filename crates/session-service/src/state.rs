//! Session state owned by the store and folded by the reducer.
//!
//! ## Status Diagram
//!
//! ```text
//!                 Registered(id)            Valid
//! Unauthenticated ──────────────► PendingValidation ──────► Authenticated
//!        ▲                                                     │
//!        │ Undefined (from any status)                         │ Terminated
//!        │                                                     ▼
//!        └──────────────────────────────────────────────── Terminated
//! ```
//!
//! Status only changes in response to Status actions; Request actions never
//! move it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authoritative session status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationStatus {
    /// No known principal.
    #[default]
    Unauthenticated,
    /// A stored identity was found but not yet verified.
    PendingValidation,
    /// The identity provider confirmed the credential.
    Authenticated,
    /// The session was stopped or revoked. The user id is kept.
    Terminated,
}

impl AuthenticationStatus {
    /// Returns true only for `Authenticated`.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthenticationStatus::Authenticated)
    }

}

/// Current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub status: AuthenticationStatus,
    /// Stable identifier of the principal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// When the session first became authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Last time a refresh was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// The state at process start, and the target of a full reset.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status.is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = SessionState::empty();
        assert_eq!(state.status, AuthenticationStatus::Unauthenticated);
        assert!(state.user_id.is_none());
        assert!(state.started_at.is_none());
        assert!(state.last_refreshed_at.is_none());
        assert!(state.is_empty());
    }

    #[test]
    fn test_status_is_authenticated() {
        assert!(!AuthenticationStatus::Unauthenticated.is_authenticated());
        assert!(!AuthenticationStatus::PendingValidation.is_authenticated());
        assert!(AuthenticationStatus::Authenticated.is_authenticated());
        assert!(!AuthenticationStatus::Terminated.is_authenticated());
    }

    #[test]
    fn test_state_serializes_without_empty_fields() {
        let json = serde_json::to_value(SessionState::empty()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "unauthenticated" }));
    }
}
