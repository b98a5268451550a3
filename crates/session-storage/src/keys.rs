//! Storage key constants.

/// Keys the session material is persisted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    /// Stable identifier of the authenticated principal.
    pub identity: String,
    /// Identity token (token-based provider variants).
    pub identity_token: String,
}

impl SessionKeys {
    /// Default identity key.
    pub const IDENTITY: &'static str = "userID";

    /// Default identity token key.
    pub const IDENTITY_TOKEN: &'static str = "id-token";

    pub fn new(identity: impl Into<String>, identity_token: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            identity_token: identity_token.into(),
        }
    }
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self::new(Self::IDENTITY, Self::IDENTITY_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys() {
        let keys = SessionKeys::default();
        assert_eq!(keys.identity, "userID");
        assert_eq!(keys.identity_token, "id-token");
        assert_ne!(keys.identity, keys.identity_token, "Storage keys must be unique");
    }
}
