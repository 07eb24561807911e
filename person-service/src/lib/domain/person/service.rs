use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::PasswordError;
use chrono::Utc;

use crate::domain::events::EventPublisher;
use crate::domain::events::PersonUpsertedEvent;
use crate::domain::metrics::NoopMetrics;
use crate::domain::metrics::OperationOutcome;
use crate::domain::metrics::ServiceMetrics;
use crate::domain::person::models::AuthToken;
use crate::domain::person::models::ChangePasswordCommand;
use crate::domain::person::models::LoginCommand;
use crate::domain::person::models::Password;
use crate::domain::person::models::Person;
use crate::domain::person::models::PersonId;
use crate::domain::person::models::PersonStatus;
use crate::domain::person::models::RegisterPersonCommand;
use crate::domain::person::models::UpdateProfileCommand;
use crate::person::errors::PersonError;
use crate::person::ports::PersonRepository;
use crate::person::ports::PersonServicePort;

/// Domain service implementation for registration, login and profile operations.
///
/// Key derivation runs on the blocking thread pool so a slow hash never
/// stalls other requests on the same runtime worker.
pub struct PersonService<PR, EP>
where
    PR: PersonRepository,
    EP: EventPublisher,
{
    repository: Arc<PR>,
    event_publisher: Arc<EP>,
    authenticator: Arc<Authenticator>,
    metrics: Arc<dyn ServiceMetrics>,
}

impl<PR, EP> PersonService<PR, EP>
where
    PR: PersonRepository,
    EP: EventPublisher,
{
    /// Create a new person service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Person persistence (usually the cache-aside decorator)
    /// * `event_publisher` - Domain event publishing implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(
        repository: Arc<PR>,
        event_publisher: Arc<EP>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            authenticator,
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
        result: Result<T, PersonError>,
    ) -> Result<T, PersonError> {
        self.metrics
            .record_operation(operation, OperationOutcome::of(&result), started.elapsed());
        result
    }

    async fn hash_password(&self, password: Password) -> Result<String, PersonError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| PersonError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(|e| PersonError::Hashing(e.to_string()))
    }

    async fn verify_password(&self, person: &Person, password: String) -> Result<(), PersonError> {
        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = person.password_hash.clone();

        let matched = tokio::task::spawn_blocking(move || {
            authenticator.verify_password(&password, &stored_hash)
        })
        .await
        .map_err(|e| PersonError::Unknown(format!("Verification task failed: {}", e)))?
        .map_err(|e| password_failure(&person.id, e))?;

        if matched {
            Ok(())
        } else {
            Err(PersonError::IncorrectCredentials)
        }
    }

    /// Costs one key derivation so an unknown identifier takes as long as a
    /// wrong password.
    async fn simulate_password_check(&self, password: String) {
        let authenticator = Arc::clone(&self.authenticator);

        if let Err(e) = tokio::task::spawn_blocking(move || {
            authenticator.simulate_password_check(&password)
        })
        .await
        {
            tracing::warn!(error = %e, "Decoy password check did not complete");
        }
    }

    async fn publish_person_upserted(&self, person: &Person) {
        let event = PersonUpsertedEvent::new(person);
        if let Err(e) = self.event_publisher.publish_person_upserted(&event).await {
            tracing::error!(
                person_id = %person.id,
                event = PersonUpsertedEvent::NAME,
                error = %e,
                "Failed to publish event"
            );
        }
    }

    async fn register_person(&self, command: RegisterPersonCommand) -> Result<Person, PersonError> {
        if self
            .repository
            .exists_by_username(&command.username)
            .await?
        {
            return Err(PersonError::already_exists("username"));
        }

        if self.repository.exists_by_email(&command.email).await? {
            return Err(PersonError::already_exists("email"));
        }

        let password_hash = self.hash_password(command.password).await?;

        let now = Utc::now();
        let person = Person {
            id: PersonId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            username: command.username,
            password_hash,
            status: PersonStatus::Active,
            dob: command.dob,
            created_at: now,
            last_modified: now,
        };

        // A concurrent registration can pass both checks; the store's unique
        // constraints still reject the second write as AlreadyExists.
        let created = self.repository.upsert(person).await?;
        tracing::info!(person_id = %created.id, "Person registered");

        self.publish_person_upserted(&created).await;

        Ok(created)
    }

    async fn login_person(&self, command: LoginCommand) -> Result<AuthToken, PersonError> {
        let LoginCommand {
            identifier,
            password,
        } = command;

        let person = match self
            .repository
            .find_by_username_or_email(&identifier)
            .await?
        {
            Some(person) => person,
            None => {
                self.simulate_password_check(password).await;
                return Err(PersonError::NotFound(identifier));
            }
        };

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = person.password_hash.clone();
        let subject = person.id;

        let outcome = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, subject.0)
        })
        .await
        .map_err(|e| PersonError::Unknown(format!("Authentication task failed: {}", e)))?;

        match outcome {
            Ok(result) => {
                tracing::info!(person_id = %subject, "Person logged in");
                Ok(AuthToken {
                    access_token: result.access_token,
                    expires_in: result.expires_in,
                    subject,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => Err(PersonError::IncorrectCredentials),
            Err(AuthenticationError::PasswordError(e)) => Err(password_failure(&subject, e)),
            Err(AuthenticationError::JwtError(e)) => Err(PersonError::Token(e.to_string())),
        }
    }

    async fn update_person(
        &self,
        id: &PersonId,
        command: UpdateProfileCommand,
    ) -> Result<Person, PersonError> {
        if !self.repository.exists(id).await? {
            return Err(PersonError::NotFound(id.to_string()));
        }

        let mut person = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| PersonError::NotFound(id.to_string()))?;

        person.first_name = command.first_name;
        person.last_name = command.last_name;
        person.dob = command.dob;
        person.last_modified = Utc::now();

        self.repository.upsert(person).await?;

        let updated = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| PersonError::NotFound(id.to_string()))?;

        self.publish_person_upserted(&updated).await;

        Ok(updated)
    }

    async fn replace_password(
        &self,
        id: &PersonId,
        command: ChangePasswordCommand,
    ) -> Result<(), PersonError> {
        let profile = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| PersonError::NotFound(id.to_string()))?;

        // Cached profiles carry no hash; credentials always come from the durable lookup.
        let person = self
            .repository
            .find_by_username_or_email(profile.username.as_str())
            .await?
            .filter(|person| person.id == *id)
            .ok_or_else(|| PersonError::NotFound(id.to_string()))?;

        self.verify_password(&person, command.current_password)
            .await?;

        let password_hash = self.hash_password(command.new_password).await?;
        self.repository.update_password(id, &password_hash).await?;

        tracing::info!(person_id = %id, "Password changed");

        Ok(())
    }
}

fn password_failure(person_id: &PersonId, err: PasswordError) -> PersonError {
    match err {
        PasswordError::MalformedHash(_) | PasswordError::UnsupportedVersion { .. } => {
            tracing::error!(
                person_id = %person_id,
                error = %err,
                "Stored password hash is corrupted; credentials for this person cannot be verified"
            );
            PersonError::CorruptedPasswordHash(err.to_string())
        }
        PasswordError::Entropy(_) | PasswordError::HashingFailed(_) => {
            PersonError::Hashing(err.to_string())
        }
    }
}

#[async_trait]
impl<PR, EP> PersonServicePort for PersonService<PR, EP>
where
    PR: PersonRepository,
    EP: EventPublisher,
{
    async fn register(&self, command: RegisterPersonCommand) -> Result<Person, PersonError> {
        let started = Instant::now();
        let result = self.register_person(command).await;
        self.observe("register", started, result)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthToken, PersonError> {
        let started = Instant::now();
        let result = self.login_person(command).await;
        self.observe("login", started, result)
    }

    async fn get_profile(&self, id: &PersonId) -> Result<Person, PersonError> {
        let started = Instant::now();
        let result = self
            .repository
            .find(id)
            .await
            .and_then(|person| person.ok_or_else(|| PersonError::NotFound(id.to_string())));
        self.observe("get_profile", started, result)
    }

    async fn update_profile(
        &self,
        id: &PersonId,
        command: UpdateProfileCommand,
    ) -> Result<Person, PersonError> {
        let started = Instant::now();
        let result = self.update_person(id, command).await;
        self.observe("update_profile", started, result)
    }

    async fn change_password(
        &self,
        id: &PersonId,
        command: ChangePasswordCommand,
    ) -> Result<(), PersonError> {
        let started = Instant::now();
        let result = self.replace_password(id, command).await;
        self.observe("change_password", started, result)
    }
}
