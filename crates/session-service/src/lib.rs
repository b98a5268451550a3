//! Session lifecycle service.
//!
//! This crate provides:
//! - Session state and the actions that drive it
//! - A pure reducer folding Status actions into state
//! - A middleware that persists identity to secure storage and verifies
//!   credentials with an identity provider (last request wins)
//! - A serialized reference store wiring the two together
//!
//! ```text
//! dispatch ──► Request ──► middleware ──► Status ──► reduce ──► SessionState
//!                              │                         ▲
//!                              └── storage / provider ───┘
//! ```

mod action;
pub mod config;
mod context;
mod error;
pub mod logging;
mod middleware;
mod provider;
mod reducer;
mod state;
mod store;

pub use action::{RequestAction, SessionAction, StatusAction, Verification};
pub use config::MiddlewareConfig;
pub use context::{
    ActionSink, Clock, MiddlewareContext, RecordingSink, StateReader, StaticState, SystemClock,
};
pub use error::{ConfigError, ConfigResult, ProviderError, SessionError};
pub use middleware::SessionMiddleware;
pub use provider::{CredentialState, IdentityProvider};
pub use reducer::reduce;
pub use state::{AuthenticationStatus, SessionState};
pub use store::{SessionStore, StoreHandle};

pub use session_storage::{IdentityVault, MemoryStorage, SecureStorage, SessionKeys};
