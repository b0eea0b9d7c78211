#![allow(async_fn_in_trait)]

use chrono::Duration;

use crate::domain::types::{CodeScope, User};
use crate::error::AuthServiceError;

/// Durable storage for user records and the per-user revocation slot.
///
/// Implementations must keep email uniqueness and revocation single-valuedness
/// under concurrent callers: the check-then-insert inside `create` and
/// `record_revocation` has to be atomic as a unit.
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    /// Insert a new unverified user and return its assigned id.
    /// Fails with `AlreadyExists` when the email is already registered.
    async fn create(&self, email: &str, password_hash: &str) -> Result<i64, AuthServiceError>;

    /// Flip `is_verified` to true. Fails with `UserNotFound` on unknown email.
    async fn mark_verified(&self, email: &str) -> Result<(), AuthServiceError>;

    /// Replace the stored password hash. Fails with `UserNotFound` on unknown email.
    async fn change_password(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AuthServiceError>;

    /// Record a logout for `user_id`. The slot is single-valued per user:
    /// once a revocation exists, every further attempt fails with
    /// `AlreadyRevoked` regardless of which token is presented.
    async fn record_revocation(&self, user_id: i64, token: &str) -> Result<(), AuthServiceError>;
}

/// Ephemeral TTL-scoped storage for one-time codes.
pub trait CodeStore: Send + Sync {
    /// Store `code` under (scope, email), overwriting any previous code for
    /// that pair. The value becomes unreadable once `ttl` lapses.
    async fn put(
        &self,
        scope: CodeScope,
        email: &str,
        code: u32,
        ttl: Duration,
    ) -> Result<(), AuthServiceError>;

    /// Fetch the live code for (scope, email). Absent and expired both
    /// surface as `None`.
    async fn get(&self, scope: CodeScope, email: &str) -> Result<Option<u32>, AuthServiceError>;
}

/// Outbound delivery of one-time codes (email, SMS, ...).
///
/// Callers treat delivery as best-effort: a send failure is logged and never
/// changes the outcome of the operation that triggered it.
pub trait CodeNotifier: Send + Sync {
    async fn send(&self, email: &str, code: u32) -> Result<(), AuthServiceError>;
}
