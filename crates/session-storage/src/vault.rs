//! High-level API for the persisted session identity.

use crate::{SecureStorage, SessionKeys, StorageResult};
use std::sync::Arc;
use tracing::debug;

/// Typed access to the identity material needed to resume a session.
#[derive(Clone)]
pub struct IdentityVault {
    storage: Arc<dyn SecureStorage>,
    keys: SessionKeys,
}

impl IdentityVault {
    /// Create a vault over the given storage backend using the default keys.
    pub fn new(storage: Arc<dyn SecureStorage>) -> Self {
        Self::with_keys(storage, SessionKeys::default())
    }

    pub fn with_keys(storage: Arc<dyn SecureStorage>, keys: SessionKeys) -> Self {
        Self { storage, keys }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    // ==========================================
    // User identity
    // ==========================================

    /// Store the user ID
    pub fn store_user_id(&self, user_id: &str) -> StorageResult<()> {
        self.storage.set(&self.keys.identity, user_id.as_bytes())?;
        debug!(key = %self.keys.identity, "User ID stored");
        Ok(())
    }

    /// Retrieve the user ID.
    ///
    /// A stored value that is not valid UTF-8 yields `StorageError::Encoding`.
    pub fn load_user_id(&self) -> StorageResult<Option<String>> {
        let user_id = self.storage.get_string(&self.keys.identity)?;
        debug!(
            key = %self.keys.identity,
            found = user_id.is_some(),
            "User ID read"
        );
        Ok(user_id)
    }

    /// Remove every persisted piece of session identity: the user id and
    /// the identity token a token-based host keeps next to it.
    ///
    /// Removing an absent entry is not an error.
    pub fn clear(&self) -> StorageResult<()> {
        let removed_id = self.storage.delete(&self.keys.identity)?;
        let removed_token = self.storage.delete(&self.keys.identity_token)?;
        debug!(removed_id, removed_token, "Session identity cleared");
        Ok(())
    }
}
