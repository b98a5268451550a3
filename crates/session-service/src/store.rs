//! Reference action bus for the session middleware.
//!
//! `SessionStore` is the single writer of [`SessionState`]. Actions are
//! processed strictly one at a time from a FIFO queue:
//!
//! 1. middleware `resolve` (stale verification completions are dropped here)
//! 2. middleware `pre_effects`
//! 3. reducer fold (the current time is captured once per action)
//! 4. middleware `post_effects` against the folded state
//! 5. emitted actions are appended to the queue in the order they were issued
//!
//! Verification completions dispatch into the same queue tagged with their
//! generation, so a result queued behind a newer request is never folded.

use crate::reducer::reduce;
use crate::{
    ActionSink, Clock, ConfigResult, IdentityProvider, MiddlewareConfig, MiddlewareContext,
    SessionAction, SessionMiddleware, SessionState, StateReader, SystemClock,
};
use session_storage::{IdentityVault, SecureStorage};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// Cloneable handle for dispatching actions into a store.
#[derive(Clone)]
pub struct StoreHandle {
    sender: mpsc::UnboundedSender<SessionAction>,
}

impl StoreHandle {
    /// Queue an action for processing.
    pub fn send(&self, action: impl Into<SessionAction>) {
        self.dispatch(action.into());
    }
}

impl ActionSink for StoreHandle {
    fn dispatch(&self, action: SessionAction) {
        if self.sender.send(action).is_err() {
            warn!("Session store is gone, dropping action");
        }
    }
}

/// Current state, published to observers on every change.
struct SharedState {
    current: watch::Sender<SessionState>,
}

impl StateReader for SharedState {
    fn state(&self) -> SessionState {
        self.current.borrow().clone()
    }
}

/// Serialized store running the reducer and the session middleware.
pub struct SessionStore {
    shared: Arc<SharedState>,
    middleware: SessionMiddleware,
    clock: Arc<dyn Clock>,
    handle: StoreHandle,
    queue: mpsc::UnboundedReceiver<SessionAction>,
}

impl SessionStore {
    /// Create a store and bind its middleware.
    ///
    /// The config is validated first. The startup resume check runs here;
    /// whatever it reports is queued and folded once the store starts
    /// processing.
    pub fn new(
        config: &MiddlewareConfig,
        storage: Arc<dyn SecureStorage>,
        provider: Arc<dyn IdentityProvider>,
    ) -> ConfigResult<Self> {
        Self::with_clock(config, storage, provider, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &MiddlewareConfig,
        storage: Arc<dyn SecureStorage>,
        provider: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let (sender, queue) = mpsc::unbounded_channel();
        let handle = StoreHandle { sender };
        let (current, _) = watch::channel(SessionState::empty());
        let shared = Arc::new(SharedState { current });

        let context = MiddlewareContext {
            state: shared.clone(),
            output: Arc::new(handle.clone()),
            vault: IdentityVault::with_keys(storage, config.keys()),
            provider,
            clock: clock.clone(),
        };
        let middleware = SessionMiddleware::bind(context, config);

        Ok(Self {
            shared,
            middleware,
            clock,
            handle,
            queue,
        })
    }

    /// A dispatcher that can be handed to UI or bus producers.
    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    /// Queue an action for processing.
    pub fn dispatch(&self, action: impl Into<SessionAction>) {
        self.handle.send(action);
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.current.subscribe()
    }

    /// Returns true while a credential verification is outstanding.
    pub fn is_verifying(&self) -> bool {
        self.middleware.is_verifying()
    }

    /// Wait for the next queued action that survives resolution, process it
    /// and return it as folded.
    pub async fn next(&mut self) -> Option<SessionAction> {
        loop {
            let action = self.queue.recv().await?;
            if let Some(folded) = self.process(action) {
                return Some(folded);
            }
        }
    }

    /// Process every action already queued, including the ones emitted
    /// while doing so. Returns the folded actions in order.
    pub fn process_pending(&mut self) -> Vec<SessionAction> {
        let mut processed = Vec::new();
        while let Ok(action) = self.queue.try_recv() {
            processed.extend(self.process(action));
        }
        processed
    }

    /// Process actions until `shutdown` resolves, then cancel any in-flight
    /// verification.
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                action = self.queue.recv() => match action {
                    Some(action) => {
                        self.process(action);
                    }
                    None => break,
                },
            }
        }
        self.middleware.shutdown();
        debug!("Session store stopped");
    }

    fn process(&mut self, action: SessionAction) -> Option<SessionAction> {
        let action = self.middleware.resolve(action)?;
        debug!(action = ?action, "Processing session action");

        let mut emitted = self.middleware.pre_effects(&action);

        let now = self.clock.now();
        let mut state = SessionState::empty();
        self.shared.current.send_if_modified(|current| {
            state = reduce(current, &action, now);
            if state == *current {
                return false;
            }
            *current = state.clone();
            true
        });

        emitted.extend(self.middleware.post_effects(&action, &state));

        for next in emitted {
            self.handle.dispatch(next);
        }
        Some(action)
    }
}
