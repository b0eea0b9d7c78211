//! In-memory reference implementations of the storage contracts.
//!
//! These are the substitutable baseline for production backends (SQL for
//! `UserStore`, a TTL cache for `CodeStore`): same contract, same error
//! surface. Maps are guarded by a reader/writer lock and the compound
//! check-then-insert sequences run under a single write lock so the
//! uniqueness invariants hold under concurrent callers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::domain::repository::{CodeStore, UserStore};
use crate::domain::types::{CodeScope, User};
use crate::error::AuthServiceError;

// ── MemoryUserStore ──────────────────────────────────────────────────────────

#[derive(Default)]
struct UserState {
    /// Keyed by email (the unique key).
    users: HashMap<String, User>,
    /// Revocation slot, keyed by user id. Single-valued per user, ever.
    revoked: HashMap<i64, String>,
    next_id: i64,
}

/// Reference durable storage. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<UserState>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The revocation token recorded for `user_id`, if any. Test inspection
    /// hook, not part of the `UserStore` contract.
    pub async fn revocation_for(&self, user_id: i64) -> Option<String> {
        self.inner.read().await.revoked.get(&user_id).cloned()
    }

    /// Toggle the 2FA flag for an existing user. Test setup hook; no
    /// service operation flips this.
    pub async fn set_two_factor(&self, email: &str, enabled: bool) {
        if let Some(user) = self.inner.write().await.users.get_mut(email) {
            user.uses_two_factor = enabled;
        }
    }
}

impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        Ok(self.inner.read().await.users.get(email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<i64, AuthServiceError> {
        // Single write lock across check and insert keeps emails unique
        // under concurrent registrations.
        let mut state = self.inner.write().await;
        if state.users.contains_key(email) {
            return Err(AuthServiceError::AlreadyExists);
        }

        state.next_id += 1;
        let id = state.next_id;
        state.users.insert(
            email.to_owned(),
            User {
                id,
                email: email.to_owned(),
                password_hash: password_hash.to_owned(),
                is_verified: false,
                uses_two_factor: false,
                is_admin: false,
            },
        );
        Ok(id)
    }

    async fn mark_verified(&self, email: &str) -> Result<(), AuthServiceError> {
        let mut state = self.inner.write().await;
        let user = state
            .users
            .get_mut(email)
            .ok_or(AuthServiceError::UserNotFound)?;
        user.is_verified = true;
        Ok(())
    }

    async fn change_password(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        let mut state = self.inner.write().await;
        let user = state
            .users
            .get_mut(email)
            .ok_or(AuthServiceError::UserNotFound)?;
        user.password_hash = password_hash.to_owned();
        Ok(())
    }

    async fn record_revocation(&self, user_id: i64, token: &str) -> Result<(), AuthServiceError> {
        let mut state = self.inner.write().await;
        if state.revoked.contains_key(&user_id) {
            return Err(AuthServiceError::AlreadyRevoked);
        }
        state.revoked.insert(user_id, token.to_owned());
        Ok(())
    }
}

// ── MemoryCodeStore ──────────────────────────────────────────────────────────

#[derive(Clone)]
struct StoredCode {
    code: u32,
    expires_at: DateTime<Utc>,
}

/// Reference ephemeral storage with per-entry TTL. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryCodeStore {
    inner: Arc<RwLock<HashMap<String, StoredCode>>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn code_key(scope: CodeScope, email: &str) -> String {
    scope.storage_key(email)
}

impl CodeStore for MemoryCodeStore {
    async fn put(
        &self,
        scope: CodeScope,
        email: &str,
        code: u32,
        ttl: Duration,
    ) -> Result<(), AuthServiceError> {
        let entry = StoredCode {
            code,
            expires_at: Utc::now() + ttl,
        };
        // Plain overwrite: at most one live code per (scope, email).
        self.inner.write().await.insert(code_key(scope, email), entry);
        Ok(())
    }

    async fn get(&self, scope: CodeScope, email: &str) -> Result<Option<u32>, AuthServiceError> {
        let map = self.inner.read().await;
        Ok(map
            .get(&code_key(scope, email))
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.code))
    }
}
