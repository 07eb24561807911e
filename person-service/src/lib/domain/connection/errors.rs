use thiserror::Error;

use crate::domain::person::errors::PersonError;

/// Top-level error for connection operations
#[derive(Debug, Clone, Error)]
pub enum ConnectionError {
    #[error("Operation not allowed: a person cannot connect to themselves")]
    SelfConnection,

    #[error("Other person not found: {0}")]
    TargetNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PersonError> for ConnectionError {
    fn from(err: PersonError) -> Self {
        ConnectionError::DatabaseError(err.to_string())
    }
}
