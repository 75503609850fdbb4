//! Persisted session state
//!
//! The web front ends keep the session in the browser's local storage under
//! the keys `token`, `username` and `role`. `SessionStore` abstracts that
//! key-value surface so the resolver can run against local storage, a file,
//! or plain memory. The store is synchronous, like the storage it models.

use std::collections::HashMap;
use std::sync::Mutex;

/// Storage key for the bearer token
pub const KEY_TOKEN: &str = "token";
/// Storage key for the login identifier
pub const KEY_USERNAME: &str = "username";
/// Storage key for the normalized role
pub const KEY_ROLE: &str = "role";

/// Key-value persistence for session state
pub trait SessionStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str);

    /// Remove a single key
    fn remove(&self, key: &str);

    /// Remove every key
    fn clear(&self);
}

/// In-memory store, the default backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }

    fn clear(&self) {
        self.values.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set(KEY_TOKEN, "abc");
        store.set(KEY_ROLE, "ADMIN");
        assert_eq!(store.get(KEY_TOKEN).as_deref(), Some("abc"));

        store.remove(KEY_TOKEN);
        assert_eq!(store.get(KEY_TOKEN), None);
        assert_eq!(store.get(KEY_ROLE).as_deref(), Some("ADMIN"));

        store.clear();
        assert_eq!(store.get(KEY_ROLE), None);
    }
}
