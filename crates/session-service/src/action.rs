//! Actions flowing through the session pipeline.

use crate::SessionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller/UI intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "user_id")]
pub enum RequestAction {
    /// A principal logged in; persist and confirm its identity.
    Start(String),
    /// Ask the identity provider whether the current user is still authorized.
    Validate,
    /// Bump the refresh timestamp.
    Refresh,
    /// Log out.
    Stop,
    /// Forget the persisted identity and return to the empty state.
    Reset,
}

/// Confirmed outcome, folded into state by the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum StatusAction {
    Valid,
    Terminated,
    Undefined,
    /// A persisted identity was found on startup.
    Registered(String),
    /// A refresh was requested at the given time.
    Refreshed(DateTime<Utc>),
    Error(SessionError),
}

/// Outcome of one credential verification, tagged with the generation that
/// started it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub generation: u64,
    pub status: StatusAction,
}

/// Top-level action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    Request(RequestAction),
    Status(StatusAction),
    /// Verification completion. The store resolves it through the middleware
    /// before folding; only the current generation becomes a Status action.
    Verified(Verification),
}

impl SessionAction {
    pub fn as_request(&self) -> Option<&RequestAction> {
        match self {
            SessionAction::Request(request) => Some(request),
            _ => None,
        }
    }

    pub fn as_status(&self) -> Option<&StatusAction> {
        match self {
            SessionAction::Status(status) => Some(status),
            _ => None,
        }
    }
}

impl From<RequestAction> for SessionAction {
    fn from(action: RequestAction) -> Self {
        SessionAction::Request(action)
    }
}

impl From<StatusAction> for SessionAction {
    fn from(action: StatusAction) -> Self {
        SessionAction::Status(action)
    }
}

impl From<Verification> for SessionAction {
    fn from(verification: Verification) -> Self {
        SessionAction::Verified(verification)
    }
}

impl From<SessionError> for StatusAction {
    fn from(error: SessionError) -> Self {
        StatusAction::Error(error)
    }
}
