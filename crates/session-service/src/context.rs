//! Capabilities handed to the middleware when it is bound to a store.
//!
//! The middleware never holds a mutable copy of the session. It reads through
//! a [`StateReader`] and emits through an [`ActionSink`]; the sink decides what
//! delivery means (queue into a store, record for a test, drop).

use crate::{IdentityProvider, SessionAction, SessionState};
use chrono::{DateTime, Utc};
use session_storage::IdentityVault;
use std::sync::{Arc, Mutex, MutexGuard};

/// Read accessor for the current session state.
pub trait StateReader: Send + Sync {
    fn state(&self) -> SessionState;
}

/// Receives actions emitted by the middleware.
///
/// Must not block: completions of asynchronous verifications dispatch from
/// arbitrary tasks.
pub trait ActionSink: Send + Sync {
    fn dispatch(&self, action: SessionAction);
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Everything the middleware needs from its host.
#[derive(Clone)]
pub struct MiddlewareContext {
    pub state: Arc<dyn StateReader>,
    pub output: Arc<dyn ActionSink>,
    pub vault: IdentityVault,
    pub provider: Arc<dyn IdentityProvider>,
    pub clock: Arc<dyn Clock>,
}

/// A sink that records all dispatched actions for testing.
#[derive(Debug, Default)]
pub struct RecordingSink {
    actions: Mutex<Vec<SessionAction>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded actions.
    pub fn actions(&self) -> Vec<SessionAction> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SessionAction>> {
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ActionSink for RecordingSink {
    fn dispatch(&self, action: SessionAction) {
        self.lock().push(action);
    }
}

/// A fixed state, for driving the middleware outside a store.
#[derive(Debug, Default)]
pub struct StaticState {
    state: Mutex<SessionState>,
}

impl StaticState {
    pub fn new(state: SessionState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn set(&self, state: SessionState) {
        *self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }
}

impl StateReader for StaticState {
    fn state(&self) -> SessionState {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RequestAction, StatusAction};

    #[test]
    fn recording_sink_records_actions() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());

        sink.dispatch(StatusAction::Valid.into());
        sink.dispatch(RequestAction::Stop.into());

        assert_eq!(sink.len(), 2);
        assert_eq!(
            sink.actions(),
            vec![
                SessionAction::Status(StatusAction::Valid),
                SessionAction::Request(RequestAction::Stop),
            ]
        );

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn static_state_returns_latest_value() {
        let reader = StaticState::default();
        assert!(reader.state().is_empty());

        reader.set(SessionState {
            user_id: Some("u1".to_string()),
            ..SessionState::empty()
        });
        assert_eq!(reader.state().user_id.as_deref(), Some("u1"));
    }
}
