use crate::{CoreError, CoreResult, SessionKey, SessionStore};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-process session store, used by tests and hosts without durable storage
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<SessionKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given entries
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (SessionKey, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, HashMap<SessionKey, String>>> {
        self.entries
            .lock()
            .map_err(|_| CoreError::storage_error("memory session store lock poisoned"))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> CoreResult<Option<String>> {
        Ok(self.lock()?.get(&key).cloned())
    }

    fn set(&self, key: SessionKey, value: &str) -> CoreResult<()> {
        self.lock()?.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> CoreResult<()> {
        self.lock()?.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenPair;

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "A1".to_string(),
            refresh_token: "R1".to_string(),
        }
    }

    #[test]
    fn test_store_login_with_remember_me_keeps_username() {
        let store = MemorySessionStore::new();
        store.store_login(&tokens(), "barista", true).unwrap();

        let session = store.session().unwrap().unwrap();
        assert_eq!(session.access_token, "A1");
        assert_eq!(session.refresh_token, "R1");
        assert_eq!(session.remembered_username.as_deref(), Some("barista"));
        assert!(session.remember_me);
    }

    #[test]
    fn test_store_login_without_remember_me_drops_username() {
        let store = MemorySessionStore::with_entries([(SessionKey::RememberedUsername, "old")]);
        store.store_login(&tokens(), "barista", false).unwrap();

        assert_eq!(store.remembered_username().unwrap(), None);
        assert!(!store.remember_me().unwrap());
    }

    #[test]
    fn test_clear_session_preserves_username_when_remembered() {
        let store = MemorySessionStore::new();
        store.store_login(&tokens(), "barista", true).unwrap();
        store.set_active_shop("shop-7").unwrap();

        store.clear_session().unwrap();

        assert_eq!(store.access_token().unwrap(), None);
        assert_eq!(store.refresh_token().unwrap(), None);
        assert_eq!(store.active_shop().unwrap(), None);
        assert_eq!(store.remembered_username().unwrap().as_deref(), Some("barista"));
    }

    #[test]
    fn test_clear_session_removes_username_without_remember_flag() {
        let store = MemorySessionStore::with_entries([
            (SessionKey::AccessToken, "A1"),
            (SessionKey::RememberedUsername, "barista"),
        ]);

        store.clear_session().unwrap();

        for key in SessionKey::ALL {
            assert_eq!(store.get(key).unwrap(), None, "{key} should be cleared");
        }
    }

    #[test]
    fn test_clear_session_is_idempotent() {
        let store = MemorySessionStore::new();
        store.clear_session().unwrap();
        store.clear_session().unwrap();
        assert_eq!(store.session().unwrap(), None);
    }

    #[test]
    fn test_blank_tokens_read_as_absent() {
        let store = MemorySessionStore::with_entries([
            (SessionKey::AccessToken, ""),
            (SessionKey::RefreshToken, "   "),
        ]);
        assert_eq!(store.access_token().unwrap(), None);
        assert_eq!(store.refresh_token().unwrap(), None);
    }
}
