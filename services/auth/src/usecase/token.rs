use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::types::User;
use crate::error::AuthServiceError;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Decimal user id.
    pub sub: String,
    pub email: String,
    pub is_admin: bool,
    pub exp: u64,
}

impl TokenClaims {
    /// The numeric user id, if the `sub` claim is well-formed.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Issue a signed HS256 session token for `user`, expiring `ttl_secs` from
/// now. The only failure mode is a signing fault.
pub fn issue_token(user: &User, ttl_secs: u64, secret: &str) -> Result<String, AuthServiceError> {
    let claims = TokenClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        is_admin: user.is_admin,
        exp: now_secs() + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))
}

/// Verify signature, algorithm and expiry of a session token and return its
/// claims. Any structural defect (bad format, wrong algorithm, bad
/// signature, lapsed expiry) collapses to `InvalidCredentials`.
pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims, AuthServiceError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthServiceError::InvalidCredentials)?;

    Ok(data.claims)
}
