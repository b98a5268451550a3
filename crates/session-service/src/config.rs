//! Configuration for the session middleware.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use session_storage::SessionKeys;
use std::path::Path;
use std::time::Duration;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Session middleware configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Storage key holding the user id.
    #[serde(default = "default_identity_key")]
    pub identity_key: String,
    /// Storage key holding the identity token.
    #[serde(default = "default_identity_token_key")]
    pub identity_token_key: String,
    /// Verify a resumed identity with the provider right after startup.
    #[serde(default)]
    pub verify_on_startup: bool,
    /// Give up on a verification after this many milliseconds.
    #[serde(default)]
    pub verification_timeout_ms: Option<u64>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_identity_key() -> String {
    SessionKeys::IDENTITY.to_string()
}

fn default_identity_token_key() -> String {
    SessionKeys::IDENTITY_TOKEN.to_string()
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            identity_key: default_identity_key(),
            identity_token_key: default_identity_token_key(),
            verify_on_startup: false,
            verification_timeout_ms: None,
        }
    }
}

impl MiddlewareConfig {
    /// Create a new config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from a file, falling back to defaults when it is
    /// missing. Environment variables win over file values.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MiddlewareConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("SESSION_SERVICE_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(raw) = std::env::var("SESSION_SERVICE_VERIFY_ON_STARTUP") {
            self.verify_on_startup = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(timeout_ms) = std::env::var("SESSION_SERVICE_VERIFICATION_TIMEOUT_MS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
        {
            self.verification_timeout_ms = Some(timeout_ms);
        }
    }

    /// Reject configurations the middleware cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.identity_key.trim().is_empty() {
            return Err(ConfigError::Invalid("identity_key is empty".to_string()));
        }
        if self.identity_token_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "identity_token_key is empty".to_string(),
            ));
        }
        if self.identity_key == self.identity_token_key {
            return Err(ConfigError::Invalid(format!(
                "identity_key and identity_token_key must differ (both '{}')",
                self.identity_key
            )));
        }
        if self.verification_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "verification_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn keys(&self) -> SessionKeys {
        SessionKeys::new(&self.identity_key, &self.identity_token_key)
    }

    pub fn verification_timeout(&self) -> Option<Duration> {
        self.verification_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = MiddlewareConfig::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.identity_key, "userID");
        assert_eq!(config.identity_token_key, "id-token");
        assert!(!config.verify_on_startup);
        assert!(config.verification_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("session.json");

        let config_json = r#"{
            "log_level": "debug",
            "identity_key": "user",
            "verify_on_startup": true,
            "verification_timeout_ms": 2500
        }"#;

        std::fs::write(&config_path, config_json).unwrap();

        let config = MiddlewareConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.identity_key, "user");
        assert_eq!(config.identity_token_key, "id-token");
        assert!(config.verify_on_startup);
        assert_eq!(
            config.verification_timeout(),
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("session.json");

        let config = MiddlewareConfig {
            identity_key: "principal".to_string(),
            ..MiddlewareConfig::default()
        };
        config.save(&config_path).unwrap();

        let loaded = MiddlewareConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = MiddlewareConfig::load(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config.identity_key, SessionKeys::IDENTITY);
    }

    #[test]
    fn test_config_invalid_json() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("session.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let result = MiddlewareConfig::load_from_file(&config_path);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_validate_rejects_shared_keys() {
        let config = MiddlewareConfig {
            identity_key: "same".to_string(),
            identity_token_key: "same".to_string(),
            ..MiddlewareConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_empty_key_and_zero_timeout() {
        let empty = MiddlewareConfig {
            identity_key: "  ".to_string(),
            ..MiddlewareConfig::default()
        };
        assert!(empty.validate().is_err());

        let zero = MiddlewareConfig {
            verification_timeout_ms: Some(0),
            ..MiddlewareConfig::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_keys() {
        let keys = MiddlewareConfig::default().keys();
        assert_eq!(keys, SessionKeys::default());
    }
}
