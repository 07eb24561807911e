use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Unexpected signing method: {0}")]
    InvalidSignatureMethod(String),

    #[error("Invalid or expired token: {0}")]
    InvalidOrExpiredToken(String),

    #[error("Token subject is missing or not a valid identifier")]
    MalformedSubject,
}
