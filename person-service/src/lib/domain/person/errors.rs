use thiserror::Error;

/// Error for PersonId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersonIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for first/last name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for password policy violations on new passwords
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for date of birth parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateOfBirthError {
    #[error("Invalid date of birth '{0}': expected YYYY-MM-DD")]
    InvalidFormat(String),

    #[error("Date of birth lies in the future")]
    InFuture,
}

/// Error for person status parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersonStatusError {
    #[error("Unknown person status: {0}")]
    Unknown(String),
}

/// Error for volatile cache operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache entry could not be encoded: {0}")]
    Serialization(String),
}

/// Top-level error for all person-related operations
#[derive(Debug, Clone, Error)]
pub enum PersonError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid person ID: {0}")]
    InvalidPersonId(#[from] PersonIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Invalid date of birth: {0}")]
    InvalidDateOfBirth(#[from] DateOfBirthError),

    #[error("Invalid status: {0}")]
    InvalidStatus(#[from] PersonStatusError),

    // Domain-level errors
    #[error("Person with this {field} already exists")]
    AlreadyExists { field: String },

    #[error("Person not found: {0}")]
    NotFound(String),

    #[error("Incorrect credentials")]
    IncorrectCredentials,

    // Infrastructure errors
    #[error("Stored password hash is unusable: {0}")]
    CorruptedPasswordHash(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl PersonError {
    pub fn already_exists(field: &str) -> Self {
        PersonError::AlreadyExists {
            field: field.to_string(),
        }
    }
}
