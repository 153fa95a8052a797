//! Persisted session model
//!
//! A session lives in durable key/value storage as a handful of string
//! entries. The [`SessionStore`] trait is the only way the client reaches that
//! storage; login, refresh and teardown all go through it.

use crate::CoreResult;
use serde::{Deserialize, Serialize};

/// Keys under which session state is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    AccessToken,
    RefreshToken,
    RememberedUsername,
    RememberMe,
    /// Shop the signed-in owner is currently managing
    ActiveShopId,
}

impl SessionKey {
    pub const ALL: [Self; 5] = [
        Self::AccessToken,
        Self::RefreshToken,
        Self::RememberedUsername,
        Self::RememberMe,
        Self::ActiveShopId,
    ];

    /// Storage key string
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
            Self::RememberedUsername => "remembered_username",
            Self::RememberMe => "remember_me",
            Self::ActiveShopId => "active_shop_id",
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access/refresh token pair issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Snapshot of a signed-in session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub remembered_username: Option<String>,
    pub remember_me: bool,
}

/// Durable key/value storage for session state.
///
/// Implementations must make each `get`/`set`/`remove` atomic per key. The
/// provided methods build the session lifecycle on top of those three.
pub trait SessionStore: Send + Sync {
    /// Read a key
    fn get(&self, key: SessionKey) -> CoreResult<Option<String>>;

    /// Write a key
    fn set(&self, key: SessionKey, value: &str) -> CoreResult<()>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&self, key: SessionKey) -> CoreResult<()>;

    fn access_token(&self) -> CoreResult<Option<String>> {
        self.get(SessionKey::AccessToken).map(non_empty)
    }

    fn set_access_token(&self, token: &str) -> CoreResult<()> {
        self.set(SessionKey::AccessToken, token)
    }

    fn refresh_token(&self) -> CoreResult<Option<String>> {
        self.get(SessionKey::RefreshToken).map(non_empty)
    }

    fn remember_me(&self) -> CoreResult<bool> {
        Ok(self.get(SessionKey::RememberMe)?.as_deref() == Some("true"))
    }

    fn set_remember_me(&self, remember: bool) -> CoreResult<()> {
        self.set(SessionKey::RememberMe, if remember { "true" } else { "false" })
    }

    fn remembered_username(&self) -> CoreResult<Option<String>> {
        self.get(SessionKey::RememberedUsername).map(non_empty)
    }

    fn active_shop(&self) -> CoreResult<Option<String>> {
        self.get(SessionKey::ActiveShopId).map(non_empty)
    }

    fn set_active_shop(&self, shop_id: &str) -> CoreResult<()> {
        self.set(SessionKey::ActiveShopId, shop_id)
    }

    /// Persist a fresh login. The username is only kept when `remember_me`
    /// is set; it never doubles as a credential.
    fn store_login(&self, tokens: &TokenPair, username: &str, remember_me: bool) -> CoreResult<()> {
        self.set(SessionKey::AccessToken, &tokens.access_token)?;
        self.set(SessionKey::RefreshToken, &tokens.refresh_token)?;
        self.set_remember_me(remember_me)?;
        if remember_me {
            self.set(SessionKey::RememberedUsername, username)
        } else {
            self.remove(SessionKey::RememberedUsername)
        }
    }

    /// Current session, if both tokens are present
    fn session(&self) -> CoreResult<Option<Session>> {
        let (Some(access_token), Some(refresh_token)) =
            (self.access_token()?, self.refresh_token()?)
        else {
            return Ok(None);
        };

        Ok(Some(Session {
            access_token,
            refresh_token,
            remembered_username: self.remembered_username()?,
            remember_me: self.remember_me()?,
        }))
    }

    /// Drop credentials and the active shop. The remembered username
    /// survives only while remember-me is set. Safe to call repeatedly.
    fn clear_session(&self) -> CoreResult<()> {
        self.remove(SessionKey::AccessToken)?;
        self.remove(SessionKey::RefreshToken)?;
        self.remove(SessionKey::ActiveShopId)?;
        if !self.remember_me()? {
            self.remove(SessionKey::RememberedUsername)?;
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
