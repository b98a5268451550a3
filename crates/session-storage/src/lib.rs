//! Secure storage abstraction for the session service.
//!
//! The concrete keychain/credential-vault backend belongs to the host. This
//! crate defines the contract the session middleware needs from it:
//! - [`SecureStorage`]: byte-oriented `set`/`get`/`delete`
//! - [`SessionKeys`]: the well-known keys the session material lives under
//! - [`IdentityVault`]: typed access to the persisted identity
//! - [`MemoryStorage`]: an in-process backend with failure injection

mod keys;
mod memory;
mod traits;
mod vault;

pub use keys::SessionKeys;
pub use memory::MemoryStorage;
pub use traits::SecureStorage;
pub use vault::IdentityVault;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Platform-specific storage error
    #[error("Platform storage error: {0}")]
    Platform(String),

    /// Key not found
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Returns true if the stored bytes were present but could not be decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, StorageError::Encoding(_))
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_decode_error() {
        assert!(StorageError::Encoding("bad utf-8".to_string()).is_decode_error());
        assert!(!StorageError::Platform("locked".to_string()).is_decode_error());
        assert!(!StorageError::NotFound("userID".to_string()).is_decode_error());
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::Platform("keychain locked".to_string());
        assert_eq!(err.to_string(), "Platform storage error: keychain locked");
    }
}
