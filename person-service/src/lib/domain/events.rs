use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::connection::models::Connection;
use crate::domain::person::models::Person;
use crate::domain::person::models::PersonId;

/// Error for event publishing operations
#[derive(Debug, Clone, Error)]
pub enum EventPublisherError {
    #[error("Failed to serialize event: {0}")]
    SerializationFailed(String),

    #[error("Failed to publish event to broker: {0}")]
    PublishFailed(String),
}

/// Published after a person is registered or their profile changes.
///
/// Carries the public projection only, never the password hash.
#[derive(Debug, Clone)]
pub struct PersonUpsertedEvent {
    pub event_id: String,
    pub person_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub dob: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl PersonUpsertedEvent {
    pub const NAME: &'static str = "Put-Person-v1";

    pub fn new(person: &Person) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            person_id: person.id.to_string(),
            first_name: person.first_name.as_str().to_string(),
            last_name: person.last_name.as_str().to_string(),
            email: person.email.as_str().to_string(),
            username: person.username.as_str().to_string(),
            dob: person.dob.to_string(),
            created_at: person.created_at,
            last_modified: person.last_modified,
        }
    }
}

/// Published after a connection is stored.
#[derive(Debug, Clone)]
pub struct ConnectionCreatedEvent {
    pub event_id: String,
    pub person_id: String,
    pub connection_to: String,
    pub created_at: DateTime<Utc>,
}

impl ConnectionCreatedEvent {
    pub const NAME: &'static str = "Put-Connection-v1";

    pub fn new(connection: &Connection) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            person_id: connection.owner.to_string(),
            connection_to: connection.target.to_string(),
            created_at: connection.created_at,
        }
    }
}

/// Published after a connection is removed.
#[derive(Debug, Clone)]
pub struct ConnectionDeletedEvent {
    pub event_id: String,
    pub person_id: String,
    pub connection_to: String,
    pub deleted_at: DateTime<Utc>,
}

impl ConnectionDeletedEvent {
    pub const NAME: &'static str = "Delete-Connection-v1";

    pub fn new(owner: &PersonId, target: &PersonId) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            person_id: owner.to_string(),
            connection_to: target.to_string(),
            deleted_at: Utc::now(),
        }
    }
}

/// Notification for the person someone else just connected to.
#[derive(Debug, Clone)]
pub struct ConnectionNotificationEvent {
    pub event_id: String,
    pub recipient: String,
    pub connection_from: String,
    pub connection_from_name: String,
    pub connection_to: String,
    pub created_at: DateTime<Utc>,
}

impl ConnectionNotificationEvent {
    pub const NAME: &'static str = "Put-Notification-v1";
    pub const KIND: &'static str = "Connection";

    pub fn new(connection: &Connection, initiator: &Person) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            recipient: connection.target.to_string(),
            connection_from: connection.owner.to_string(),
            connection_from_name: initiator.first_name.as_str().to_string(),
            connection_to: connection.target.to_string(),
            created_at: connection.created_at,
        }
    }
}

/// Side-channel for notifying other systems of state changes.
///
/// Callers log failures and carry on; a failed publish never fails the
/// operation that triggered it.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    async fn publish_person_upserted(
        &self,
        event: &PersonUpsertedEvent,
    ) -> Result<(), EventPublisherError>;

    async fn publish_connection_created(
        &self,
        event: &ConnectionCreatedEvent,
    ) -> Result<(), EventPublisherError>;

    async fn publish_connection_deleted(
        &self,
        event: &ConnectionDeletedEvent,
    ) -> Result<(), EventPublisherError>;

    async fn publish_connection_notification(
        &self,
        event: &ConnectionNotificationEvent,
    ) -> Result<(), EventPublisherError>;
}
