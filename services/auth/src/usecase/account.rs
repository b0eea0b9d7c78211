use chrono::Duration;
use tracing::debug;

use crate::domain::repository::{CodeNotifier, CodeStore, UserStore};
use crate::domain::types::{CodeScope, MSG_CODE_SENT, MSG_SUCCESS};
use crate::error::AuthServiceError;
use crate::password;
use crate::usecase::code::generate_code;

/// Registration, email verification and password recovery.
///
/// Holds no state of its own beyond the injected collaborators; every
/// inbound call is handled independently.
pub struct AccountService<U, C, N>
where
    U: UserStore,
    C: CodeStore,
    N: CodeNotifier,
{
    pub users: U,
    pub codes: C,
    pub notifier: N,
    /// Lifetime of stored one-time codes.
    pub code_ttl: Duration,
}

impl<U, C, N> AccountService<U, C, N>
where
    U: UserStore,
    C: CodeStore,
    N: CodeNotifier,
{
    /// Create a new unverified user and return its assigned id.
    ///
    /// Not idempotent: retrying after success yields `AlreadyExists`.
    pub async fn register(&self, email: &str, pass: &str) -> Result<i64, AuthServiceError> {
        debug!(email, "trying to register user");

        if email.is_empty() || pass.is_empty() {
            debug!(email, "register rejected: empty email or password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let hash = password::hash_password(pass)?;

        let user_id = self.users.create(email, &hash).await.map_err(|e| match e {
            // Duplicate key propagates verbatim; every other storage fault
            // is an internal error to the caller.
            AuthServiceError::AlreadyExists => AuthServiceError::AlreadyExists,
            AuthServiceError::Internal(cause) => AuthServiceError::Internal(cause),
            other => AuthServiceError::Internal(anyhow::anyhow!(
                "unexpected storage error on create: {other}"
            )),
        })?;

        debug!(email, user_id, "user registered");
        Ok(user_id)
    }

    /// Generate and dispatch an email-verification code.
    ///
    /// An unknown email is folded into `InvalidCredentials` so callers
    /// cannot probe which addresses are registered.
    pub async fn email_verify_send_code(
        &self,
        email: &str,
    ) -> Result<&'static str, AuthServiceError> {
        debug!(email, "trying to send email verify code");
        self.send_code(CodeScope::EmailVerify, email).await?;
        Ok(MSG_CODE_SENT)
    }

    /// Mark the user verified if `code` matches the live EmailVerify code.
    pub async fn email_verify(
        &self,
        email: &str,
        code: u32,
    ) -> Result<&'static str, AuthServiceError> {
        debug!(email, code, "trying to verify user's email");

        self.check_code(CodeScope::EmailVerify, email, code).await?;

        self.users.mark_verified(email).await.map_err(|e| match e {
            // The user disappearing between code match and write still
            // reads as InvalidCredentials from outside.
            AuthServiceError::UserNotFound => AuthServiceError::InvalidCredentials,
            other => other,
        })?;

        debug!(email, "user's email verified");
        Ok(MSG_SUCCESS)
    }

    /// Generate and dispatch a password-recovery code. Mirrors
    /// `email_verify_send_code`, including the enumeration folding.
    pub async fn password_recover_send_code(
        &self,
        email: &str,
    ) -> Result<&'static str, AuthServiceError> {
        debug!(email, "trying to send pass recover code");
        self.send_code(CodeScope::PasswordRecover, email).await?;
        Ok(MSG_CODE_SENT)
    }

    /// Replace the user's password if `code` matches the live
    /// PasswordRecover code.
    ///
    /// Unlike `email_verify`, a missing user on the final write surfaces as
    /// `UserNotFound`: at this point the email was already proven known by
    /// the code match, so there is nothing left to hide.
    pub async fn password_recover(
        &self,
        email: &str,
        new_pass: &str,
        code: u32,
    ) -> Result<&'static str, AuthServiceError> {
        debug!(email, code, "trying to change user's password");

        if new_pass.is_empty() {
            debug!(email, "password recover rejected: empty new password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        self.check_code(CodeScope::PasswordRecover, email, code)
            .await?;

        let hash = password::hash_password(new_pass)?;
        self.users.change_password(email, &hash).await?;

        debug!(email, "user's password changed");
        Ok(MSG_SUCCESS)
    }

    /// Shared send path: resolve the user, draw a code, dispatch it
    /// best-effort, persist it under `scope` with the configured TTL.
    async fn send_code(&self, scope: CodeScope, email: &str) -> Result<(), AuthServiceError> {
        if email.is_empty() {
            debug!(?scope, "send code rejected: empty email");
            return Err(AuthServiceError::InvalidCredentials);
        }

        if self.users.find_by_email(email).await?.is_none() {
            debug!(?scope, email, "send code rejected: unknown email");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let code = generate_code();

        // Delivery outcome is not part of this call's contract.
        if let Err(e) = self.notifier.send(email, code).await {
            debug!(?scope, email, error = %e, "code dispatch failed");
        }

        self.codes.put(scope, email, code, self.code_ttl).await?;

        debug!(?scope, email, "one-time code stored");
        Ok(())
    }

    /// Shared match path: reject the zero sentinel, then compare against the
    /// live stored code. Absent, expired and mismatched all collapse to
    /// `InvalidCredentials`.
    async fn check_code(
        &self,
        scope: CodeScope,
        email: &str,
        code: u32,
    ) -> Result<(), AuthServiceError> {
        if email.is_empty() || code == 0 {
            debug!(?scope, "code check rejected: empty email or zero code");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let stored = self
            .codes
            .get(scope, email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if stored != code {
            debug!(?scope, email, "code check rejected: mismatch");
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(())
    }
}
