/// A registered account as held by durable storage.
///
/// `id` is assigned by the store on creation and never changes.
/// `is_verified` flips false→true exactly once (email verification);
/// `password_hash` is replaced by password recovery. Users are never
/// deleted by this service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub is_verified: bool,
    pub uses_two_factor: bool,
    pub is_admin: bool,
}

/// Workflow a one-time code belongs to. At most one live code exists per
/// (scope, email); storing a new one overwrites the previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeScope {
    TwoFactor,
    EmailVerify,
    PasswordRecover,
}

impl CodeScope {
    /// Storage key prefix, kept compatible with the cache-backend key scheme.
    pub fn key_prefix(self) -> &'static str {
        match self {
            Self::TwoFactor => "2fa_code_key",
            Self::EmailVerify => "email_verify_key",
            Self::PasswordRecover => "pass_recover_key",
        }
    }

    /// Full storage key for a scoped code. Cache backends and the in-memory
    /// store share this layout, including the space after the colon.
    pub fn storage_key(self, email: &str) -> String {
        format!("{}: {}", self.key_prefix(), email)
    }
}

/// Inclusive bounds of the one-time code space (always four digits).
pub const CODE_MIN: u32 = 1000;
pub const CODE_MAX: u32 = 9999;

/// Token time-to-live in seconds when `TOKEN_TTL_SECS` is unset (24h).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// One-time code time-to-live in seconds when `CODE_TTL_SECS` is unset (10m).
pub const DEFAULT_CODE_TTL_SECS: i64 = 600;

// Fixed messages the transport layer re-encodes verbatim.
pub const MSG_AUTHORIZED: &str = "Authorized";
pub const MSG_TWO_FACTOR_SENT: &str = "2FA code sent";
pub const MSG_CODE_SENT: &str = "Code sent";
pub const MSG_SUCCESS: &str = "Success";
