use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::domain::events::ConnectionCreatedEvent;
use crate::domain::events::ConnectionDeletedEvent;
use crate::domain::events::ConnectionNotificationEvent;
use crate::domain::events::EventPublisher;
use crate::domain::events::EventPublisherError;
use crate::domain::events::PersonUpsertedEvent;
use crate::outbound::events::messages::ConnectionCreatedMessage;
use crate::outbound::events::messages::ConnectionDeletedMessage;
use crate::outbound::events::messages::NotificationMessage;
use crate::outbound::events::messages::PersonUpsertedMessage;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for EventPublisherError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => {
                EventPublisherError::SerializationFailed(msg)
            }
            KafkaProducerError::SendError(msg) => EventPublisherError::PublishFailed(msg),
        }
    }
}

/// Publishes domain events to Kafka, one topic per event name.
pub struct KafkaEventProducer {
    producer: FutureProducer,
    timeout: Duration,
}

impl KafkaEventProducer {
    /// Create a Kafka producer with "at least once" delivery semantics.
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Prevents duplicate messages during retries
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(brokers = %config.kafka.brokers, "Initializing Kafka producer");

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.kafka.brokers)
            .set("message.timeout.ms", "30000")
            .set("queue.buffering.max.messages", "10000")
            .set("compression.type", "gzip")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "10")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retry.backoff.ms", "100")
            .create()?;

        Ok(Self {
            producer,
            timeout: Duration::from_secs(30),
        })
    }

    /// Serialize `message` to JSON and send it to `topic`, keyed by `key`
    /// so every event about one person lands on the same partition.
    async fn publish<T: Serialize>(
        &self,
        topic: &str,
        key: &str,
        message: &T,
    ) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        let record = FutureRecord::to(topic).key(key).payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| {
                tracing::debug!(topic, key, "Event published");
            })
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }
}

#[async_trait]
impl EventPublisher for KafkaEventProducer {
    async fn publish_person_upserted(
        &self,
        event: &PersonUpsertedEvent,
    ) -> Result<(), EventPublisherError> {
        let message = PersonUpsertedMessage::from(event);
        Ok(self
            .publish(PersonUpsertedEvent::NAME, &event.person_id, &message)
            .await?)
    }

    async fn publish_connection_created(
        &self,
        event: &ConnectionCreatedEvent,
    ) -> Result<(), EventPublisherError> {
        let message = ConnectionCreatedMessage::from(event);
        Ok(self
            .publish(ConnectionCreatedEvent::NAME, &event.person_id, &message)
            .await?)
    }

    async fn publish_connection_deleted(
        &self,
        event: &ConnectionDeletedEvent,
    ) -> Result<(), EventPublisherError> {
        let message = ConnectionDeletedMessage::from(event);
        Ok(self
            .publish(ConnectionDeletedEvent::NAME, &event.person_id, &message)
            .await?)
    }

    async fn publish_connection_notification(
        &self,
        event: &ConnectionNotificationEvent,
    ) -> Result<(), EventPublisherError> {
        let message = NotificationMessage::from(event);
        Ok(self
            .publish(ConnectionNotificationEvent::NAME, &event.recipient, &message)
            .await?)
    }
}
