use async_trait::async_trait;

use crate::domain::connection::errors::ConnectionError;
use crate::domain::connection::models::Connection;
use crate::domain::connection::models::ConnectionSummary;
use crate::domain::connection::models::SaveOutcome;
use crate::domain::person::models::PersonId;

/// Port for connection operations performed by an authenticated person.
#[async_trait]
pub trait ConnectionServicePort: Send + Sync + 'static {
    /// Connect `owner` to `target`. Connecting twice returns the stored
    /// connection and emits nothing.
    ///
    /// # Errors
    /// * `SelfConnection` - `owner` and `target` are the same person
    /// * `TargetNotFound` - `target` does not exist
    async fn connect(&self, owner: &PersonId, target: &PersonId)
        -> Result<Connection, ConnectionError>;

    async fn disconnect(&self, owner: &PersonId, target: &PersonId)
        -> Result<(), ConnectionError>;

    async fn list_connections(
        &self,
        owner: &PersonId,
    ) -> Result<Vec<ConnectionSummary>, ConnectionError>;
}

/// Persistence operations for connections.
#[async_trait]
pub trait ConnectionRepository: Send + Sync + 'static {
    /// Store a connection; an existing pair is left untouched and returned.
    async fn save(&self, connection: &Connection) -> Result<SaveOutcome, ConnectionError>;

    async fn delete(&self, owner: &PersonId, target: &PersonId) -> Result<(), ConnectionError>;

    async fn find_by_owner(&self, owner: &PersonId)
        -> Result<Vec<ConnectionSummary>, ConnectionError>;
}
