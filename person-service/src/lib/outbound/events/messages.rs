use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::events::ConnectionCreatedEvent;
use crate::domain::events::ConnectionDeletedEvent;
use crate::domain::events::ConnectionNotificationEvent;
use crate::domain::events::PersonUpsertedEvent;

/// Wire message for `Put-Person-v1`. The password hash is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonUpsertedMessage {
    pub event_id: String,
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub username: String,
    pub dob: String,
    pub datetime_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl From<&PersonUpsertedEvent> for PersonUpsertedMessage {
    fn from(event: &PersonUpsertedEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            id: event.person_id.clone(),
            first_name: event.first_name.clone(),
            last_name: event.last_name.clone(),
            email_address: event.email.clone(),
            username: event.username.clone(),
            dob: event.dob.clone(),
            datetime_created: event.created_at,
            last_modified: event.last_modified,
        }
    }
}

/// Wire message for `Put-Connection-v1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCreatedMessage {
    pub event_id: String,
    pub user_id: String,
    pub connection_to: String,
    pub datetime_created: DateTime<Utc>,
}

impl From<&ConnectionCreatedEvent> for ConnectionCreatedMessage {
    fn from(event: &ConnectionCreatedEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            user_id: event.person_id.clone(),
            connection_to: event.connection_to.clone(),
            datetime_created: event.created_at,
        }
    }
}

/// Wire message for `Delete-Connection-v1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDeletedMessage {
    pub event_id: String,
    pub user_id: String,
    pub connection_to: String,
    pub datetime_deleted: DateTime<Utc>,
}

impl From<&ConnectionDeletedEvent> for ConnectionDeletedMessage {
    fn from(event: &ConnectionDeletedEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            user_id: event.person_id.clone(),
            connection_to: event.connection_to.clone(),
            datetime_deleted: event.deleted_at,
        }
    }
}

/// Wire message for `Put-Notification-v1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    pub event_id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: ConnectionNotificationPayload,
    pub datetime_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionNotificationPayload {
    pub connection_from: String,
    pub connection_from_name: String,
    pub connection_to: String,
}

impl From<&ConnectionNotificationEvent> for NotificationMessage {
    fn from(event: &ConnectionNotificationEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            user_id: event.recipient.clone(),
            kind: ConnectionNotificationEvent::KIND.to_string(),
            payload: ConnectionNotificationPayload {
                connection_from: event.connection_from.clone(),
                connection_from_name: event.connection_from_name.clone(),
                connection_to: event.connection_to.clone(),
            },
            datetime_created: event.created_at,
        }
    }
}
