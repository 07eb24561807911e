use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::person::errors::CacheError;
use crate::domain::person::models::DateOfBirth;
use crate::domain::person::models::EmailAddress;
use crate::domain::person::models::Name;
use crate::domain::person::models::Person;
use crate::domain::person::models::PersonId;
use crate::domain::person::models::Username;
use crate::domain::person::ports::CacheStore;
use crate::domain::person::ports::PersonRepository;
use crate::person::errors::PersonError;

/// Written in place of the password hash on every cached profile.
pub const REDACTED_PASSWORD_HASH: &str = "-";

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

fn cache_key(id: &PersonId) -> String {
    format!("person-{}", id)
}

/// Cached projection of a person. Never holds a usable password hash.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedPerson {
    id: Uuid,
    first_name: String,
    last_name: String,
    email_address: String,
    username: String,
    password_hash: String,
    status: String,
    dob: NaiveDate,
    datetime_created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl From<&Person> for CachedPerson {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.0,
            first_name: person.first_name.as_str().to_string(),
            last_name: person.last_name.as_str().to_string(),
            email_address: person.email.as_str().to_string(),
            username: person.username.as_str().to_string(),
            password_hash: REDACTED_PASSWORD_HASH.to_string(),
            status: person.status.as_str().to_string(),
            dob: person.dob.date(),
            datetime_created: person.created_at,
            last_modified: person.last_modified,
        }
    }
}

impl TryFrom<CachedPerson> for Person {
    type Error = PersonError;

    fn try_from(cached: CachedPerson) -> Result<Self, Self::Error> {
        Ok(Person {
            id: PersonId(cached.id),
            first_name: Name::new(cached.first_name)?,
            last_name: Name::new(cached.last_name)?,
            email: EmailAddress::new(cached.email_address)?,
            username: Username::new(cached.username)?,
            password_hash: cached.password_hash,
            status: cached.status.parse()?,
            dob: DateOfBirth::from_stored(cached.dob),
            created_at: cached.datetime_created,
            last_modified: cached.last_modified,
        })
    }
}

/// Cache-aside decorator over a durable [`PersonRepository`].
///
/// Only `upsert` and `find` touch the cache. Every credential or uniqueness
/// read goes straight to the durable store, since cached profiles carry
/// the redaction sentinel instead of a hash. A cache failure is logged and
/// never fails an operation the durable store completed.
pub struct CachedPersonRepository<R, C>
where
    R: PersonRepository,
    C: CacheStore,
{
    durable: Arc<R>,
    cache: Arc<C>,
    ttl: Duration,
}

impl<R, C> CachedPersonRepository<R, C>
where
    R: PersonRepository,
    C: CacheStore,
{
    pub fn new(durable: Arc<R>, cache: Arc<C>) -> Self {
        Self::with_ttl(durable, cache, DEFAULT_TTL)
    }

    pub fn with_ttl(durable: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            durable,
            cache,
            ttl,
        }
    }

    async fn read_cached(&self, id: &PersonId) -> Option<Person> {
        let raw = match self.cache.get(&cache_key(id)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(person_id = %id, error = %e, "Cache read failed, using durable store");
                return None;
            }
        };

        match serde_json::from_str::<CachedPerson>(&raw)
            .map_err(|e| e.to_string())
            .and_then(|cached| Person::try_from(cached).map_err(|e| e.to_string()))
        {
            Ok(person) => Some(person),
            Err(e) => {
                tracing::warn!(person_id = %id, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn write_cached(&self, person: &Person) {
        let result = serde_json::to_string(&CachedPerson::from(person))
            .map_err(|e| CacheError::Serialization(e.to_string()));

        let result = match result {
            Ok(value) => self.cache.set(&cache_key(&person.id), value, self.ttl).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::warn!(person_id = %person.id, error = %e, "Cache write failed");
        }
    }
}

#[async_trait]
impl<R, C> PersonRepository for CachedPersonRepository<R, C>
where
    R: PersonRepository,
    C: CacheStore,
{
    async fn upsert(&self, person: Person) -> Result<Person, PersonError> {
        let stored = self.durable.upsert(person).await?;
        self.write_cached(&stored).await;
        Ok(stored)
    }

    async fn update_password(
        &self,
        id: &PersonId,
        password_hash: &str,
    ) -> Result<(), PersonError> {
        self.durable.update_password(id, password_hash).await
    }

    async fn find(&self, id: &PersonId) -> Result<Option<Person>, PersonError> {
        if let Some(person) = self.read_cached(id).await {
            tracing::debug!(person_id = %id, "Cache hit");
            return Ok(Some(person));
        }

        let person = self.durable.find(id).await?;
        if let Some(person) = &person {
            self.write_cached(person).await;
        }
        Ok(person)
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Person>, PersonError> {
        self.durable.find_by_username_or_email(identifier).await
    }

    async fn exists(&self, id: &PersonId) -> Result<bool, PersonError> {
        self.durable.exists(id).await
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, PersonError> {
        self.durable.exists_by_email(email).await
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, PersonError> {
        self.durable.exists_by_username(username).await
    }
}
