use chrono::Duration;
use tracing::debug;

use crate::domain::repository::{CodeNotifier, CodeStore, UserStore};
use crate::domain::types::{CodeScope, MSG_AUTHORIZED, MSG_SUCCESS, MSG_TWO_FACTOR_SENT, User};
use crate::error::AuthServiceError;
use crate::password;
use crate::usecase::code::generate_code;
use crate::usecase::token::{decode_token, issue_token};

/// Result of a login attempt.
///
/// `token` is empty while a second factor is pending; the session only
/// becomes authenticated once `login_with_2fa_code` matches.
#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
    pub message: &'static str,
}

/// Login, second-factor login and logout/revocation.
pub struct SessionService<U, C, N>
where
    U: UserStore,
    C: CodeStore,
    N: CodeNotifier,
{
    pub users: U,
    pub codes: C,
    pub notifier: N,
    /// HMAC secret for session tokens.
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    pub token_ttl_secs: u64,
    /// Lifetime of stored 2FA codes.
    pub code_ttl: Duration,
}

impl<U, C, N> SessionService<U, C, N>
where
    U: UserStore,
    C: CodeStore,
    N: CodeNotifier,
{
    /// Authenticate by email and password.
    ///
    /// Empty inputs, unknown email and wrong password all collapse to
    /// `InvalidCredentials` so the caller cannot tell which check failed.
    /// For users with 2FA enabled no token is issued yet: a code is
    /// dispatched and the caller must follow up with `login_with_2fa_code`
    /// before the stored code's TTL lapses.
    pub async fn login(&self, email: &str, pass: &str) -> Result<LoginOutput, AuthServiceError> {
        debug!(email, "trying to login user");

        if email.is_empty() || pass.is_empty() {
            debug!(email, "login rejected: empty email or password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !password::verify_password(&user.password_hash, pass)? {
            debug!(email, "login rejected: wrong password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        if user.uses_two_factor {
            let code = generate_code();

            // Delivery outcome is not part of this call's contract.
            if let Err(e) = self.notifier.send(email, code).await {
                debug!(email, error = %e, "2FA code dispatch failed");
            }

            self.codes
                .put(CodeScope::TwoFactor, email, code, self.code_ttl)
                .await?;

            debug!(email, "2FA code stored, token withheld");
            return Ok(LoginOutput {
                token: String::new(),
                message: MSG_TWO_FACTOR_SENT,
            });
        }

        let token = self.issue(&user)?;
        debug!(email, "user logged in");
        Ok(LoginOutput {
            token,
            message: MSG_AUTHORIZED,
        })
    }

    /// Complete a 2FA-gated login with the code delivered by `login`.
    ///
    /// On a match the user is re-fetched and a token issued exactly as the
    /// plain login path would have.
    pub async fn login_with_2fa_code(
        &self,
        email: &str,
        code: u32,
    ) -> Result<String, AuthServiceError> {
        debug!(email, code, "trying to login user with 2FA code");

        if email.is_empty() || code == 0 {
            debug!(email, "2FA login rejected: empty email or zero code");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let stored = self
            .codes
            .get(CodeScope::TwoFactor, email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if stored != code {
            debug!(email, "2FA login rejected: code mismatch");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        let token = self.issue(&user)?;
        debug!(email, "user logged in with 2FA");
        Ok(token)
    }

    /// Revoke the session identified by `token`.
    ///
    /// The revocation slot is per user, not per token: the first logout for
    /// a user wins and every later attempt fails `AlreadyRevoked`, whatever
    /// token it presents.
    pub async fn logout(&self, token: &str) -> Result<&'static str, AuthServiceError> {
        debug!("trying to logout user");

        if token.is_empty() {
            debug!("logout rejected: empty token");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let claims = decode_token(token, &self.jwt_secret)?;
        let user_id = claims
            .user_id()
            .ok_or(AuthServiceError::InvalidCredentials)?;

        self.users.record_revocation(user_id, token).await?;

        debug!(user_id, "user logged out");
        Ok(MSG_SUCCESS)
    }

    fn issue(&self, user: &User) -> Result<String, AuthServiceError> {
        issue_token(user, self.token_ttl_secs, &self.jwt_secret)
    }
}
