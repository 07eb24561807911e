use std::time::Duration;

use async_trait::async_trait;

use crate::domain::person::models::AuthToken;
use crate::domain::person::models::ChangePasswordCommand;
use crate::domain::person::models::EmailAddress;
use crate::domain::person::models::LoginCommand;
use crate::domain::person::models::Person;
use crate::domain::person::models::PersonId;
use crate::domain::person::models::RegisterPersonCommand;
use crate::domain::person::models::UpdateProfileCommand;
use crate::domain::person::models::Username;
use crate::person::errors::CacheError;
use crate::person::errors::PersonError;

/// Port for person domain service operations.
#[async_trait]
pub trait PersonServicePort: Send + Sync + 'static {
    /// Register a new person.
    ///
    /// # Arguments
    /// * `command` - Validated registration data including the cleartext password
    ///
    /// # Returns
    /// Created person
    ///
    /// # Errors
    /// * `AlreadyExists { field: "username" }` - Username is already taken
    /// * `AlreadyExists { field: "email" }` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterPersonCommand) -> Result<Person, PersonError>;

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `NotFound` - No person with this username or email
    /// * `IncorrectCredentials` - Password does not match
    /// * `CorruptedPasswordHash` - Stored hash cannot be parsed
    async fn login(&self, command: LoginCommand) -> Result<AuthToken, PersonError>;

    /// Retrieve a profile by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Person does not exist
    async fn get_profile(&self, id: &PersonId) -> Result<Person, PersonError>;

    /// Replace first name, last name and date of birth.
    ///
    /// # Returns
    /// The stored profile after the update
    ///
    /// # Errors
    /// * `NotFound` - Person does not exist
    async fn update_profile(
        &self,
        id: &PersonId,
        command: UpdateProfileCommand,
    ) -> Result<Person, PersonError>;

    /// Replace the password after checking the current one.
    ///
    /// # Errors
    /// * `NotFound` - Person does not exist
    /// * `IncorrectCredentials` - Current password does not match
    async fn change_password(
        &self,
        id: &PersonId,
        command: ChangePasswordCommand,
    ) -> Result<(), PersonError>;
}

/// Persistence operations for the person aggregate.
#[async_trait]
pub trait PersonRepository: Send + Sync + 'static {
    /// Insert a person, or update first name, last name and date of birth
    /// when the identifier already exists.
    ///
    /// # Errors
    /// * `AlreadyExists` - Username or email taken by another person
    /// * `DatabaseError` - Database operation failed
    async fn upsert(&self, person: Person) -> Result<Person, PersonError>;

    /// Replace the stored password hash.
    ///
    /// # Errors
    /// * `NotFound` - Person does not exist
    async fn update_password(&self, id: &PersonId, password_hash: &str)
        -> Result<(), PersonError>;

    async fn find(&self, id: &PersonId) -> Result<Option<Person>, PersonError>;

    /// Look a person up by username or email address.
    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Person>, PersonError>;

    async fn exists(&self, id: &PersonId) -> Result<bool, PersonError>;

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, PersonError>;

    async fn exists_by_username(&self, username: &Username) -> Result<bool, PersonError>;
}

/// Volatile key-value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Fetch a live entry; expired entries read as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}
