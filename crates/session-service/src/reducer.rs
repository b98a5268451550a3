//! Pure session reducer.
//!
//! `reduce` never performs I/O and never reads the clock: the current time is
//! captured once by the caller and passed in.
//!
//! `Authenticated` always carries a user id: `Valid` without one is ignored.

use crate::{AuthenticationStatus, RequestAction, SessionAction, SessionState, StatusAction};
use chrono::{DateTime, Utc};

/// Fold one action into the session state.
pub fn reduce(state: &SessionState, action: &SessionAction, now: DateTime<Utc>) -> SessionState {
    let mut next = state.clone();

    match action {
        SessionAction::Request(RequestAction::Start(user_id)) => {
            if next.user_id.as_deref() != Some(user_id.as_str()) {
                next.started_at = None;
            }
            next.user_id = Some(user_id.clone());
        }
        SessionAction::Request(_) => {}
        SessionAction::Status(StatusAction::Valid) => {
            if next.user_id.is_none() {
                return next;
            }
            // started_at marks the transition into Authenticated.
            if !next.status.is_authenticated() || next.started_at.is_none() {
                next.started_at = Some(now);
            }
            next.status = AuthenticationStatus::Authenticated;
        }
        SessionAction::Status(StatusAction::Terminated) => {
            next.status = AuthenticationStatus::Terminated;
        }
        SessionAction::Status(StatusAction::Undefined) => {
            next = SessionState::empty();
        }
        SessionAction::Status(StatusAction::Registered(user_id)) => {
            if next.user_id.as_deref() != Some(user_id.as_str()) {
                next.started_at = None;
            }
            next.status = AuthenticationStatus::PendingValidation;
            next.user_id = Some(user_id.clone());
        }
        SessionAction::Status(StatusAction::Refreshed(at)) => {
            next.last_refreshed_at = Some(*at);
        }
        SessionAction::Status(StatusAction::Error(_)) => {}
        // Unresolved completions never touch state.
        SessionAction::Verified(_) => {}
    }

    next
}
