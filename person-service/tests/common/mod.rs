#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashParams;
use auth::JwtHandler;
use auth::PasswordHasher;
use person_service::connection::errors::ConnectionError;
use person_service::connection::models::Connection;
use person_service::connection::models::ConnectionSummary;
use person_service::connection::models::SaveOutcome;
use person_service::connection::ports::ConnectionRepository;
use person_service::connection::service::ConnectionService;
use person_service::domain::events::ConnectionCreatedEvent;
use person_service::domain::events::ConnectionDeletedEvent;
use person_service::domain::events::ConnectionNotificationEvent;
use person_service::domain::events::EventPublisher;
use person_service::domain::events::EventPublisherError;
use person_service::domain::events::PersonUpsertedEvent;
use person_service::inbound::http::metrics::PrometheusMetrics;
use person_service::inbound::http::router::create_router;
use person_service::inbound::http::router::AppState;
use person_service::outbound::cache::InMemoryCacheStore;
use person_service::person::errors::PersonError;
use person_service::person::models::EmailAddress;
use person_service::person::models::Person;
use person_service::person::models::PersonId;
use person_service::person::models::Username;
use person_service::person::ports::PersonRepository;
use person_service::person::service::PersonService;
use person_service::repositories::CachedPersonRepository;
use serde_json::json;
use serde_json::Value;

const PRIVATE_KEY: &[u8] = include_bytes!("../../../auth/tests/fixtures/private_key.pem");
const PUBLIC_KEY: &[u8] = include_bytes!("../../../auth/tests/fixtures/public_key.pem");

/// Person store mirroring the PostgreSQL adapter: unique username and
/// email, and an upsert that only touches name, date of birth and
/// modification time of an existing row.
#[derive(Default)]
pub struct InMemoryPersonRepository {
    persons: Mutex<HashMap<PersonId, Person>>,
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn upsert(&self, person: Person) -> Result<Person, PersonError> {
        let mut persons = self.persons.lock().unwrap();

        if let Some(existing) = persons.get_mut(&person.id) {
            existing.first_name = person.first_name;
            existing.last_name = person.last_name;
            existing.dob = person.dob;
            existing.last_modified = person.last_modified;
            return Ok(existing.clone());
        }

        if persons.values().any(|p| p.username == person.username) {
            return Err(PersonError::already_exists("username"));
        }
        if persons.values().any(|p| p.email == person.email) {
            return Err(PersonError::already_exists("email"));
        }

        persons.insert(person.id, person.clone());
        Ok(person)
    }

    async fn update_password(&self, id: &PersonId, password_hash: &str) -> Result<(), PersonError> {
        let mut persons = self.persons.lock().unwrap();
        let person = persons
            .get_mut(id)
            .ok_or_else(|| PersonError::NotFound(id.to_string()))?;
        person.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn find(&self, id: &PersonId) -> Result<Option<Person>, PersonError> {
        Ok(self.persons.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Person>, PersonError> {
        Ok(self
            .persons
            .lock()
            .unwrap()
            .values()
            .find(|p| p.username.as_str() == identifier || p.email.as_str() == identifier)
            .cloned())
    }

    async fn exists(&self, id: &PersonId) -> Result<bool, PersonError> {
        Ok(self.persons.lock().unwrap().contains_key(id))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, PersonError> {
        Ok(self.persons.lock().unwrap().values().any(|p| &p.email == email))
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, PersonError> {
        Ok(self
            .persons
            .lock()
            .unwrap()
            .values()
            .any(|p| &p.username == username))
    }
}

pub struct InMemoryConnectionRepository {
    persons: Arc<InMemoryPersonRepository>,
    connections: Mutex<Vec<Connection>>,
}

impl InMemoryConnectionRepository {
    pub fn new(persons: Arc<InMemoryPersonRepository>) -> Self {
        Self {
            persons,
            connections: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn save(&self, connection: &Connection) -> Result<SaveOutcome, ConnectionError> {
        let mut connections = self.connections.lock().unwrap();
        if let Some(existing) = connections
            .iter()
            .find(|c| c.owner == connection.owner && c.target == connection.target)
        {
            return Ok(SaveOutcome::AlreadyConnected(existing.clone()));
        }
        connections.push(connection.clone());
        Ok(SaveOutcome::Created)
    }

    async fn delete(&self, owner: &PersonId, target: &PersonId) -> Result<(), ConnectionError> {
        self.connections
            .lock()
            .unwrap()
            .retain(|c| !(c.owner == *owner && c.target == *target));
        Ok(())
    }

    async fn find_by_owner(
        &self,
        owner: &PersonId,
    ) -> Result<Vec<ConnectionSummary>, ConnectionError> {
        let connections = self.connections.lock().unwrap().clone();
        let persons = self.persons.persons.lock().unwrap();

        Ok(connections
            .iter()
            .filter(|c| c.owner == *owner)
            .filter_map(|c| {
                persons.get(&c.target).map(|p| ConnectionSummary {
                    person_id: c.target,
                    first_name: p.first_name.as_str().to_string(),
                    last_name: p.last_name.as_str().to_string(),
                    created_at: c.created_at,
                })
            })
            .collect())
    }
}

/// Publisher that remembers the name of every event it was handed.
#[derive(Default)]
pub struct RecordingEventPublisher {
    published: Mutex<Vec<String>>,
}

impl RecordingEventPublisher {
    pub fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.published.lock().unwrap().push(name.to_string());
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish_person_upserted(
        &self,
        _: &PersonUpsertedEvent,
    ) -> Result<(), EventPublisherError> {
        self.record(PersonUpsertedEvent::NAME);
        Ok(())
    }

    async fn publish_connection_created(
        &self,
        _: &ConnectionCreatedEvent,
    ) -> Result<(), EventPublisherError> {
        self.record(ConnectionCreatedEvent::NAME);
        Ok(())
    }

    async fn publish_connection_deleted(
        &self,
        _: &ConnectionDeletedEvent,
    ) -> Result<(), EventPublisherError> {
        self.record(ConnectionDeletedEvent::NAME);
        Ok(())
    }

    async fn publish_connection_notification(
        &self,
        _: &ConnectionNotificationEvent,
    ) -> Result<(), EventPublisherError> {
        self.record(ConnectionNotificationEvent::NAME);
        Ok(())
    }
}

/// Test application that spawns a real server over in-memory adapters.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub events: Arc<RecordingEventPublisher>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let hasher = PasswordHasher::with_params(HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        });
        let jwt_handler =
            JwtHandler::from_rsa_pem(PRIVATE_KEY, PUBLIC_KEY).expect("Failed to load test keys");
        let authenticator = Arc::new(Authenticator::new(hasher, jwt_handler));

        let durable = Arc::new(InMemoryPersonRepository::default());
        let person_repository = Arc::new(CachedPersonRepository::new(
            Arc::clone(&durable),
            Arc::new(InMemoryCacheStore::new(1_000)),
        ));
        let connection_repository = Arc::new(InMemoryConnectionRepository::new(durable));
        let events = Arc::new(RecordingEventPublisher::default());
        let metrics = Arc::new(PrometheusMetrics::new());

        let person_service = PersonService::new(
            Arc::clone(&person_repository),
            Arc::clone(&events),
            Arc::clone(&authenticator),
        )
        .with_metrics(metrics.clone());
        let connection_service = ConnectionService::new(
            connection_repository,
            person_repository,
            Arc::clone(&events),
        )
        .with_metrics(metrics.clone());

        let state = AppState {
            person_service: Arc::new(person_service),
            connection_service: Arc::new(connection_service),
            authenticator,
        };
        let router = create_router(state, metrics);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            events,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a person and return the response body's `data`.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/v1/auth/register")
            .json(&json!({
                "firstName": "Alice",
                "lastName": "Liddell",
                "emailAddress": email,
                "username": username,
                "password": password,
                "dob": "1990-01-01"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Log in and return the access token.
    pub async fn login(&self, identifier: &str, password: &str) -> String {
        let response = self
            .post("/api/v1/auth/login")
            .json(&json!({ "username": identifier, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["accessToken"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }
}
