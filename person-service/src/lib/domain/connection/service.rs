use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::domain::connection::errors::ConnectionError;
use crate::domain::connection::models::Connection;
use crate::domain::connection::models::ConnectionSummary;
use crate::domain::connection::models::SaveOutcome;
use crate::domain::connection::ports::ConnectionRepository;
use crate::domain::connection::ports::ConnectionServicePort;
use crate::domain::events::ConnectionCreatedEvent;
use crate::domain::events::ConnectionDeletedEvent;
use crate::domain::events::ConnectionNotificationEvent;
use crate::domain::events::EventPublisher;
use crate::domain::metrics::NoopMetrics;
use crate::domain::metrics::OperationOutcome;
use crate::domain::metrics::ServiceMetrics;
use crate::domain::person::models::PersonId;
use crate::domain::person::ports::PersonRepository;

/// Domain service for the connections ledger.
///
/// The actor is always the identity bound by the request gate.
pub struct ConnectionService<CR, PR, EP>
where
    CR: ConnectionRepository,
    PR: PersonRepository,
    EP: EventPublisher,
{
    repository: Arc<CR>,
    person_repository: Arc<PR>,
    event_publisher: Arc<EP>,
    metrics: Arc<dyn ServiceMetrics>,
}

impl<CR, PR, EP> ConnectionService<CR, PR, EP>
where
    CR: ConnectionRepository,
    PR: PersonRepository,
    EP: EventPublisher,
{
    pub fn new(repository: Arc<CR>, person_repository: Arc<PR>, event_publisher: Arc<EP>) -> Self {
        Self {
            repository,
            person_repository,
            event_publisher,
            metrics: Arc::new(NoopMetrics),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn ServiceMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    fn observe<T>(
        &self,
        operation: &'static str,
        started: Instant,
        result: Result<T, ConnectionError>,
    ) -> Result<T, ConnectionError> {
        self.metrics
            .record_operation(operation, OperationOutcome::of(&result), started.elapsed());
        result
    }

    async fn create_connection(
        &self,
        owner: &PersonId,
        target: &PersonId,
    ) -> Result<Connection, ConnectionError> {
        if owner == target {
            return Err(ConnectionError::SelfConnection);
        }

        if self.person_repository.find(target).await?.is_none() {
            return Err(ConnectionError::TargetNotFound(target.to_string()));
        }

        let connection = Connection::new(*owner, *target);
        if let SaveOutcome::AlreadyConnected(existing) = self.repository.save(&connection).await? {
            tracing::debug!(person_id = %owner, target = %target, "Already connected");
            return Ok(existing);
        }

        let event = ConnectionCreatedEvent::new(&connection);
        if let Err(e) = self.event_publisher.publish_connection_created(&event).await {
            tracing::error!(
                person_id = %owner,
                event = ConnectionCreatedEvent::NAME,
                error = %e,
                "Failed to publish event"
            );
        }

        self.notify_target(&connection).await;

        Ok(connection)
    }

    async fn notify_target(&self, connection: &Connection) {
        let initiator = match self.person_repository.find(&connection.owner).await {
            Ok(Some(person)) => person,
            Ok(None) => {
                tracing::warn!(person_id = %connection.owner, "Initiator vanished, skipping notification");
                return;
            }
            Err(e) => {
                tracing::error!(person_id = %connection.owner, error = %e, "Failed to load initiator for notification");
                return;
            }
        };

        let event = ConnectionNotificationEvent::new(connection, &initiator);
        if let Err(e) = self
            .event_publisher
            .publish_connection_notification(&event)
            .await
        {
            tracing::error!(
                recipient = %connection.target,
                event = ConnectionNotificationEvent::NAME,
                error = %e,
                "Failed to publish event"
            );
        }
    }

    async fn remove_connection(
        &self,
        owner: &PersonId,
        target: &PersonId,
    ) -> Result<(), ConnectionError> {
        self.repository.delete(owner, target).await?;

        let event = ConnectionDeletedEvent::new(owner, target);
        if let Err(e) = self.event_publisher.publish_connection_deleted(&event).await {
            tracing::error!(
                person_id = %owner,
                event = ConnectionDeletedEvent::NAME,
                error = %e,
                "Failed to publish event"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl<CR, PR, EP> ConnectionServicePort for ConnectionService<CR, PR, EP>
where
    CR: ConnectionRepository,
    PR: PersonRepository,
    EP: EventPublisher,
{
    async fn connect(
        &self,
        owner: &PersonId,
        target: &PersonId,
    ) -> Result<Connection, ConnectionError> {
        let started = Instant::now();
        let result = self.create_connection(owner, target).await;
        self.observe("connect", started, result)
    }

    async fn disconnect(&self, owner: &PersonId, target: &PersonId) -> Result<(), ConnectionError> {
        let started = Instant::now();
        let result = self.remove_connection(owner, target).await;
        self.observe("disconnect", started, result)
    }

    async fn list_connections(
        &self,
        owner: &PersonId,
    ) -> Result<Vec<ConnectionSummary>, ConnectionError> {
        let started = Instant::now();
        let result = self.repository.find_by_owner(owner).await;
        self.observe("list_connections", started, result)
    }
}
