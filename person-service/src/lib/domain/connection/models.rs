use chrono::DateTime;
use chrono::Utc;

use crate::domain::person::models::PersonId;

/// Directed link from `owner` to `target`; unique per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub owner: PersonId,
    pub target: PersonId,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    pub fn new(owner: PersonId, target: PersonId) -> Self {
        Self {
            owner,
            target,
            created_at: Utc::now(),
        }
    }
}

/// What `save` found when storing a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    /// The pair was already linked; carries the stored record.
    AlreadyConnected(Connection),
}

/// A connection as listed for its owner, with the target's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSummary {
    pub person_id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}
