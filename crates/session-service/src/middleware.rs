//! Session middleware: turns Request actions into side effects and Status
//! actions.
//!
//! Processing an action is split into two explicit phases around the
//! reducer fold:
//!
//! ```text
//! action ──► pre_effects ──► reduce ──► post_effects
//!               │                           │
//!               └──── emitted actions ◄─────┘   (returned, in order)
//!
//! verification task ──► ActionSink ──► resolve ──► reduce
//!                     (Verified, tagged)   (stale generations dropped)
//! ```
//!
//! Persisting a new identity is the one effect that depends on the folded
//! state: `Start(id)` is recorded by the reducer first, then written to
//! secure storage in `post_effects`.

use crate::{
    CredentialState, MiddlewareConfig, MiddlewareContext, ProviderError, RequestAction,
    SessionAction, SessionError, SessionState, StatusAction, Verification,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Orchestrates storage and identity-provider side effects for a session.
///
/// Owns at most one in-flight credential verification. Starting a new one,
/// resetting, stopping or dropping the middleware supersedes it: the task is
/// aborted, and a completion that was already queued is dropped by
/// [`SessionMiddleware::resolve`] because its generation is no longer current.
pub struct SessionMiddleware {
    context: MiddlewareContext,
    verify_on_startup: bool,
    verification_timeout: Option<Duration>,
    /// Generation of the verification whose result may still be dispatched.
    generation: Arc<Mutex<u64>>,
    in_flight: Option<JoinHandle<()>>,
}

impl SessionMiddleware {
    /// Bind the middleware to its host and run the startup resume check.
    ///
    /// Must be called from within a Tokio runtime when `verify_on_startup`
    /// is enabled.
    pub fn bind(context: MiddlewareContext, config: &MiddlewareConfig) -> Self {
        let mut middleware = Self {
            context,
            verify_on_startup: config.verify_on_startup,
            verification_timeout: config.verification_timeout(),
            generation: Arc::new(Mutex::new(0)),
            in_flight: None,
        };
        middleware.resume_on_startup();
        middleware
    }

    /// Look for a persisted identity and report it.
    ///
    /// A clean miss dispatches nothing.
    fn resume_on_startup(&mut self) {
        match self.context.vault.load_user_id() {
            Ok(Some(user_id)) => {
                info!(user_id = %user_id, "Stored identity found on startup");
                self.emit(StatusAction::Registered(user_id.clone()));
                if self.verify_on_startup {
                    self.start_verification(user_id);
                }
            }
            Ok(None) => {
                info!("No stored identity found on startup");
            }
            Err(e) if e.is_decode_error() => {
                warn!(error = %e, "Stored identity could not be decoded");
                self.emit(StatusAction::Error(SessionError::CredentialDecodeFailed));
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored identity on startup");
                self.emit(StatusAction::Error(SessionError::StorageReadFailed));
            }
        }
    }

    /// Turn a queued action into the action the reducer should fold.
    ///
    /// A verification completion becomes its Status action if its generation
    /// is still current and `None` otherwise. Everything else passes through.
    pub fn resolve(&self, action: SessionAction) -> Option<SessionAction> {
        let (generation, status) = match action {
            SessionAction::Verified(Verification { generation, status }) => (generation, status),
            other => return Some(other),
        };

        let current = self.generation();
        if generation != current {
            debug!(
                generation,
                current,
                status = ?status,
                "Discarding superseded verification result"
            );
            return None;
        }
        Some(status.into())
    }

    /// Effects that run before the reducer sees `action`.
    pub fn pre_effects(&mut self, action: &SessionAction) -> Vec<SessionAction> {
        let SessionAction::Request(request) = action else {
            return Vec::new();
        };

        match request {
            RequestAction::Start(_) => {
                // A new login invalidates whatever verification was running.
                self.supersede();
                Vec::new()
            }
            RequestAction::Validate => {
                let user_id = self.context.state.state().user_id;
                match user_id {
                    Some(user_id) => {
                        self.start_verification(user_id);
                        Vec::new()
                    }
                    None => {
                        debug!("Validate requested without a user id");
                        self.supersede();
                        vec![StatusAction::Undefined.into()]
                    }
                }
            }
            RequestAction::Refresh => {
                vec![StatusAction::Refreshed(self.context.clock.now()).into()]
            }
            RequestAction::Stop => {
                self.supersede();
                info!("Session stopped");
                vec![StatusAction::Terminated.into()]
            }
            RequestAction::Reset => {
                self.supersede();
                match self.context.vault.clear() {
                    Ok(()) => {
                        info!("Session reset");
                        vec![StatusAction::Undefined.into()]
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to remove stored identity");
                        vec![StatusAction::Error(SessionError::StorageWriteFailed).into()]
                    }
                }
            }
        }
    }

    /// Effects that run after the reducer folded `action` into `state`.
    pub fn post_effects(
        &mut self,
        action: &SessionAction,
        state: &SessionState,
    ) -> Vec<SessionAction> {
        match action {
            SessionAction::Request(RequestAction::Start(_)) => {
                let Some(user_id) = state.user_id.as_deref() else {
                    return Vec::new();
                };
                match self.context.vault.store_user_id(user_id) {
                    Ok(()) => {
                        info!(user_id = %user_id, "Identity persisted");
                        vec![StatusAction::Valid.into()]
                    }
                    Err(e) => {
                        warn!(user_id = %user_id, error = %e, "Failed to persist identity");
                        vec![StatusAction::Error(SessionError::StorageWriteFailed).into()]
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    /// Returns true while a verification task is running.
    pub fn is_verifying(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Generation of the most recent verification (or supersession).
    pub fn generation(&self) -> u64 {
        *lock(&self.generation)
    }

    /// Cancel any in-flight verification. Nothing is dispatched for it
    /// afterwards.
    pub fn shutdown(&mut self) {
        self.supersede();
    }

    fn start_verification(&mut self, user_id: String) {
        let generation = self.bump_generation();
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }

        debug!(user_id = %user_id, generation, "Starting credential verification");

        let provider = self.context.provider.clone();
        let output = self.context.output.clone();
        let current = self.generation.clone();
        let timeout = self.verification_timeout;

        self.in_flight = Some(tokio::spawn(async move {
            let result = match timeout {
                Some(limit) => {
                    match tokio::time::timeout(limit, provider.credential_state(&user_id)).await {
                        Ok(result) => result,
                        Err(_) => Err(ProviderError::Timeout),
                    }
                }
                None => provider.credential_state(&user_id).await,
            };
            let credential = CredentialState::normalize(result);

            let current = *lock(&current);
            if current != generation {
                debug!(
                    user_id = %user_id,
                    generation,
                    current,
                    "Dropping superseded verification result"
                );
                return;
            }
            info!(user_id = %user_id, credential = ?credential, "Credential verification completed");
            output.dispatch(
                Verification {
                    generation,
                    status: credential.into_status(),
                }
                .into(),
            );
        }));
    }

    fn supersede(&mut self) {
        let generation = self.bump_generation();
        if let Some(task) = self.in_flight.take() {
            task.abort();
            debug!(generation, "Superseded in-flight verification");
        }
    }

    fn bump_generation(&self) -> u64 {
        let mut current = lock(&self.generation);
        *current += 1;
        *current
    }

    fn emit(&self, action: StatusAction) {
        self.context.output.dispatch(action.into());
    }
}

impl Drop for SessionMiddleware {
    fn drop(&mut self) {
        self.supersede();
    }
}

fn lock(generation: &Mutex<u64>) -> MutexGuard<'_, u64> {
    generation
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
