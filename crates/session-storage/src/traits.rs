//! Storage trait definitions.

use crate::{StorageError, StorageResult};

/// Trait for secure storage backends.
///
/// Values are opaque byte payloads. `get` distinguishes a clean miss
/// (`Ok(None)`) from a failed read (`Err`).
pub trait SecureStorage: Send + Sync {
    /// Store a value securely
    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Delete a value. Returns whether an entry existed.
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Check if a key exists
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Retrieve a value as a UTF-8 string.
    fn get_string(&self, key: &str) -> StorageResult<Option<String>> {
        match self.get(key)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| StorageError::Encoding(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }
}
