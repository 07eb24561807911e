use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::parse_person_id;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::connection::models::Connection;
use crate::domain::connection::ports::ConnectionServicePort;
use crate::inbound::http::middleware::AuthenticatedPerson;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;

/// Body shared by connect and disconnect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub connection_to: String,
}

pub async fn connect(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedPerson>,
    Extension(context): Extension<RequestContext>,
    JsonBody(body): JsonBody<ConnectionRequest>,
) -> Result<ApiSuccess<ConnectionData>, ApiError> {
    let target = parse_person_id(&body.connection_to)?;

    state
        .connection_service
        .connect(&actor.person_id, &target)
        .await
        .map_err(ApiError::from)
        .map(|ref connection| {
            tracing::info!(
                request_id = %context.request_id,
                person_id = %actor.person_id,
                target = %target,
                "Connection stored"
            );
            ApiSuccess::new(StatusCode::CREATED, connection.into())
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    pub user_id: String,
    pub connection_to: String,
    pub datetime_created: DateTime<Utc>,
}

impl From<&Connection> for ConnectionData {
    fn from(connection: &Connection) -> Self {
        Self {
            user_id: connection.owner.to_string(),
            connection_to: connection.target.to_string(),
            datetime_created: connection.created_at,
        }
    }
}
