use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Secure random source unavailable: {0}")]
    Entropy(String),

    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("Unsupported hash version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
