use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::connection::errors::ConnectionError;
use crate::domain::connection::models::Connection;
use crate::domain::connection::models::ConnectionSummary;
use crate::domain::connection::models::SaveOutcome;
use crate::domain::connection::ports::ConnectionRepository;
use crate::domain::person::models::PersonId;

#[derive(sqlx::FromRow)]
struct ConnectionSummaryRow {
    connected_to: Uuid,
    first_name: String,
    last_name: String,
    datetime_created: DateTime<Utc>,
}

impl From<ConnectionSummaryRow> for ConnectionSummary {
    fn from(row: ConnectionSummaryRow) -> Self {
        Self {
            person_id: PersonId(row.connected_to),
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.datetime_created,
        }
    }
}

pub struct PostgresConnectionRepository {
    pool: PgPool,
}

impl PostgresConnectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectionRepository for PostgresConnectionRepository {
    async fn save(&self, connection: &Connection) -> Result<SaveOutcome, ConnectionError> {
        let inserted: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            INSERT INTO connection (user_id, connected_to, datetime_created)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING datetime_created
            "#,
        )
        .bind(connection.owner.0)
        .bind(connection.target.0)
        .bind(connection.created_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return ConnectionError::TargetNotFound(connection.target.to_string());
                }
            }
            ConnectionError::DatabaseError(e.to_string())
        })?;

        if inserted.is_some() {
            return Ok(SaveOutcome::Created);
        }

        // The conflicting row is committed once DO NOTHING returns.
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            "SELECT datetime_created FROM connection WHERE user_id = $1 AND connected_to = $2",
        )
        .bind(connection.owner.0)
        .bind(connection.target.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ConnectionError::DatabaseError(e.to_string()))?;

        Ok(SaveOutcome::AlreadyConnected(Connection {
            owner: connection.owner,
            target: connection.target,
            created_at,
        }))
    }

    async fn delete(&self, owner: &PersonId, target: &PersonId) -> Result<(), ConnectionError> {
        sqlx::query("DELETE FROM connection WHERE user_id = $1 AND connected_to = $2")
            .bind(owner.0)
            .bind(target.0)
            .execute(&self.pool)
            .await
            .map_err(|e| ConnectionError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_owner(
        &self,
        owner: &PersonId,
    ) -> Result<Vec<ConnectionSummary>, ConnectionError> {
        let rows: Vec<ConnectionSummaryRow> = sqlx::query_as(
            r#"
            SELECT c.connected_to, p.first_name, p.last_name, c.datetime_created
            FROM connection c
            JOIN person p ON p.id = c.connected_to
            WHERE c.user_id = $1
            ORDER BY c.datetime_created
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ConnectionError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(ConnectionSummary::from).collect())
    }
}
