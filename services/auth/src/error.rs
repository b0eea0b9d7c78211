/// Auth service domain error variants.
///
/// `InvalidCredentials` deliberately covers every input-validation failure,
/// lookup miss, and comparison mismatch so a caller cannot tell which check
/// failed (account enumeration avoidance). `UserNotFound` leaks through only
/// where the email has already been proven known by a valid recovery code.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    AlreadyExists,
    #[error("token already revoked")]
    AlreadyRevoked,
    #[error("user not found")]
    UserNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::AlreadyRevoked => "ALREADY_REVOKED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(anyhow::anyhow!(msg.into()))
    }
}
