//! Credential storage and management
//!
//! Holds the configured accounts. Passwords live only in configuration.

use std::collections::HashMap;

/// Username to password table loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(users: HashMap<String, String>) -> Self {
        let users = users
            .into_iter()
            .map(|(name, password)| (name.to_lowercase(), password))
            .collect();
        Self { users }
    }

    pub fn password_for(&self, username: &str) -> Option<&str> {
        self.users.get(username).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_are_stored_lowercase() {
        let store = CredentialStore::new(HashMap::from([("Alice".to_string(), "pw".to_string())]));
        assert_eq!(store.password_for("Alice"), None);
        assert_eq!(store.password_for("alice"), Some("pw"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_store_knows_nobody() {
        let store = CredentialStore::default();
        assert!(store.is_empty());
        assert_eq!(store.password_for("admin"), None);
    }
}
