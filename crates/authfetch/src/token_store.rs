//! In-memory token storage.
//!
//! This module provides a thread-safe, single-value store for the current
//! [`AccessToken`]. The store is the only place an access token lives in
//! process memory; callers always read through it and it is never persisted.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::token::AccessToken;

#[derive(Debug, Default)]
struct Inner {
    token: Option<AccessToken>,
    /// Bumped on every observable mutation; lets refresh callers detect
    /// that another task already replaced the token they saw fail.
    epoch: u64,
}

/// Thread-safe in-memory holder for the current access token.
///
/// Cheap to clone; clones share the same underlying slot. Reads are
/// concurrent, writes are atomic single-value replacement.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Inner>>,
}

/// A point-in-time view of the store, used to coordinate refreshes.
#[derive(Debug, Clone)]
pub struct TokenSnapshot {
    /// The token held at snapshot time, if any.
    pub token: Option<AccessToken>,
    /// The store epoch at snapshot time.
    pub epoch: u64,
}

impl TokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the currently held token, or `None` if absent.
    pub async fn get(&self) -> Option<AccessToken> {
        let inner = self.inner.read().await;
        inner.token.clone()
    }

    /// Replaces the held token unconditionally.
    pub async fn set(&self, token: AccessToken) {
        let mut inner = self.inner.write().await;
        inner.token = Some(token);
        inner.epoch += 1;
    }

    /// Removes the held token, returning the store to its initial state.
    ///
    /// Idempotent: clearing an already-empty store is a no-op.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        if inner.token.is_some() {
            inner.token = None;
            inner.epoch += 1;
        }
    }

    /// Returns the current token together with the store epoch.
    pub async fn snapshot(&self) -> TokenSnapshot {
        let inner = self.inner.read().await;
        TokenSnapshot {
            token: inner.token.clone(),
            epoch: inner.epoch,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_set_and_get_token() {
        let store = TokenStore::new();
        assert!(store.get().await.is_none());

        store.set(AccessToken::new("access123")).await;

        let retrieved = store.get().await;
        assert_eq!(retrieved.unwrap().as_str(), "access123");
    }

    #[tokio::test]
    async fn test_set_replaces_unconditionally() {
        let store = TokenStore::new();
        store.set(AccessToken::new("first")).await;
        store.set(AccessToken::new("second")).await;

        assert_eq!(store.get().await.unwrap().as_str(), "second");
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = TokenStore::new();
        store.set(AccessToken::new("access123")).await;

        store.clear().await;
        let after_once = store.snapshot().await;
        store.clear().await;
        let after_twice = store.snapshot().await;

        assert!(after_once.token.is_none());
        assert!(after_twice.token.is_none());
        assert_eq!(after_once.epoch, after_twice.epoch);
    }

    #[tokio::test]
    async fn test_epoch_advances_on_set() {
        let store = TokenStore::new();
        let before = store.snapshot().await;

        store.set(AccessToken::new("access123")).await;
        let after = store.snapshot().await;

        assert!(after.epoch > before.epoch);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = TokenStore::new();
        let alias = store.clone();

        store.set(AccessToken::new("shared")).await;
        assert_eq!(alias.get().await.unwrap().as_str(), "shared");
    }
}
