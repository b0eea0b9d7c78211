use crate::domain::types::{DEFAULT_CODE_TTL_SECS, DEFAULT_TOKEN_TTL_SECS};

/// Auth service configuration loaded from environment variables.
///
/// Consumed once at construction time; the services never read the
/// environment themselves.
#[derive(Debug)]
pub struct AuthConfig {
    /// HMAC secret for signing and verifying session tokens.
    pub jwt_secret: String,
    /// Session token lifetime in seconds. Env var: `TOKEN_TTL_SECS`.
    pub token_ttl_secs: u64,
    /// One-time code lifetime in seconds. Env var: `CODE_TTL_SECS`.
    pub code_ttl_secs: i64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            token_ttl_secs: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            code_ttl_secs: std::env::var("CODE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CODE_TTL_SECS),
        }
    }
}
