use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::person::models::DateOfBirth;
use crate::domain::person::models::EmailAddress;
use crate::domain::person::models::Name;
use crate::domain::person::models::Person;
use crate::domain::person::models::PersonId;
use crate::domain::person::models::Username;
use crate::domain::person::ports::PersonRepository;
use crate::person::errors::PersonError;

const PERSON_COLUMNS: &str = "id, first_name, last_name, email_address, username, password_hash, \
                              status, dob, datetime_created, last_modified";

#[derive(sqlx::FromRow)]
struct PersonRow {
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

impl TryFrom<PersonRow> for Person {
    type Error = PersonError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        Ok(Person {
            id: PersonId(row.id),
            first_name: Name::new(row.first_name)?,
            last_name: Name::new(row.last_name)?,
            email: EmailAddress::new(row.email_address)?,
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            status: row.status.parse()?,
            dob: DateOfBirth::from_stored(row.dob),
            created_at: row.datetime_created,
            last_modified: row.last_modified,
        })
    }
}

/// Durable person store on PostgreSQL; the source of truth for every read.
pub struct PostgresPersonRepository {
    pool: PgPool,
}

impl PostgresPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Upsert keyed on id. A conflict only rewrites the editable profile
/// fields; identity, credentials and status stay as first stored.
fn upsert_query() -> String {
    format!(
        r#"
        INSERT INTO person (id, first_name, last_name, email_address, username,
                            password_hash, status, dob, datetime_created, last_modified)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id) DO UPDATE
        SET first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            dob = EXCLUDED.dob,
            last_modified = EXCLUDED.last_modified
        RETURNING {PERSON_COLUMNS}
        "#
    )
}

/// Field reported to the caller when a named unique constraint trips.
fn conflicting_field(constraint: Option<&str>) -> Option<&'static str> {
    match constraint {
        Some("person_username_key") => Some("username"),
        Some("person_email_address_key") => Some("email"),
        _ => None,
    }
}

fn map_write_error(e: sqlx::Error) -> PersonError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if let Some(field) = conflicting_field(db_err.constraint()) {
                return PersonError::already_exists(field);
            }
        }
    }
    PersonError::DatabaseError(e.to_string())
}

#[async_trait]
impl PersonRepository for PostgresPersonRepository {
    async fn upsert(&self, person: Person) -> Result<Person, PersonError> {
        let row: PersonRow = sqlx::query_as(&upsert_query())
        .bind(person.id.0)
        .bind(person.first_name.as_str())
        .bind(person.last_name.as_str())
        .bind(person.email.as_str())
        .bind(person.username.as_str())
        .bind(&person.password_hash)
        .bind(person.status.as_str())
        .bind(person.dob.date())
        .bind(person.created_at)
        .bind(person.last_modified)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    async fn update_password(
        &self,
        id: &PersonId,
        password_hash: &str,
    ) -> Result<(), PersonError> {
        let result = sqlx::query(
            r#"
            UPDATE person
            SET password_hash = $2, last_modified = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| PersonError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PersonError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn find(&self, id: &PersonId) -> Result<Option<Person>, PersonError> {
        let row: Option<PersonRow> =
            sqlx::query_as(&format!("SELECT {PERSON_COLUMNS} FROM person WHERE id = $1"))
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PersonError::DatabaseError(e.to_string()))?;

        row.map(Person::try_from).transpose()
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<Person>, PersonError> {
        let row: Option<PersonRow> = sqlx::query_as(&format!(
            "SELECT {PERSON_COLUMNS} FROM person WHERE username = $1 OR email_address = $1 LIMIT 1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PersonError::DatabaseError(e.to_string()))?;

        row.map(Person::try_from).transpose()
    }

    async fn exists(&self, id: &PersonId) -> Result<bool, PersonError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM person WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersonError::DatabaseError(e.to_string()))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, PersonError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM person WHERE email_address = $1)")
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersonError::DatabaseError(e.to_string()))
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, PersonError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM person WHERE username = $1)")
            .bind(username.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PersonError::DatabaseError(e.to_string()))
    }
}
