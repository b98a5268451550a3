//! In-memory storage backend.
//!
//! Used by tests and by hosts that do not need persistence across restarts.
//! Each operation class can be switched to fail, to exercise the error paths
//! of callers.

use crate::{SecureStorage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-memory storage with failure injection.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
    delete_attempts: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one entry.
    pub fn with_entry(key: &str, value: &[u8]) -> Self {
        let storage = Self::new();
        storage.data().insert(key.to_string(), value.to_vec());
        storage
    }

    /// Make every subsequent `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete` fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of `delete` calls made, successful or not.
    pub fn delete_attempts(&self) -> usize {
        self.delete_attempts.load(Ordering::SeqCst)
    }

    /// Raw snapshot of a stored value, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.data().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn data(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SecureStorage for MemoryStorage {
    fn set(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Platform(format!("write rejected for {}", key)));
        }
        self.data().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Platform(format!("read rejected for {}", key)));
        }
        Ok(self.data().get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Platform(format!("delete rejected for {}", key)));
        }
        Ok(self.data().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();

        // Test set and get
        storage.set("test_key", b"test_value").unwrap();
        assert_eq!(storage.get("test_key").unwrap(), Some(b"test_value".to_vec()));

        // Test has
        assert!(storage.has("test_key").unwrap());
        assert!(!storage.has("nonexistent").unwrap());

        // Test delete
        assert!(storage.delete("test_key").unwrap());
        assert!(!storage.delete("test_key").unwrap());
        assert_eq!(storage.get("test_key").unwrap(), None);
        assert_eq!(storage.delete_attempts(), 2);
    }

    #[test]
    fn test_get_string_rejects_invalid_utf8() {
        let storage = MemoryStorage::with_entry("userID", &[0xff, 0xfe]);

        let err = storage.get_string("userID").unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_failure_injection() {
        let storage = MemoryStorage::with_entry("userID", b"u1");

        storage.fail_reads(true);
        assert!(storage.get("userID").is_err());
        storage.fail_reads(false);
        assert!(storage.get("userID").unwrap().is_some());

        storage.fail_writes(true);
        assert!(storage.set("userID", b"u2").is_err());
        assert_eq!(storage.peek("userID"), Some(b"u1".to_vec()));

        storage.fail_deletes(true);
        assert!(storage.delete("userID").is_err());
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.delete_attempts(), 1);
    }
}
