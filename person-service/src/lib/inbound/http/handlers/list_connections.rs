use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::connection::models::ConnectionSummary;
use crate::domain::connection::ports::ConnectionServicePort;
use crate::inbound::http::middleware::AuthenticatedPerson;
use crate::inbound::http::router::AppState;

pub async fn list_connections(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedPerson>,
) -> Result<ApiSuccess<Vec<ConnectionSummaryData>>, ApiError> {
    state
        .connection_service
        .list_connections(&actor.person_id)
        .await
        .map_err(ApiError::from)
        .map(|connections| {
            ApiSuccess::new(
                StatusCode::OK,
                connections.iter().map(ConnectionSummaryData::from).collect(),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSummaryData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub datetime_created: DateTime<Utc>,
}

impl From<&ConnectionSummary> for ConnectionSummaryData {
    fn from(summary: &ConnectionSummary) -> Self {
        Self {
            id: summary.person_id.to_string(),
            first_name: summary.first_name.clone(),
            last_name: summary.last_name.clone(),
            datetime_created: summary.created_at,
        }
    }
}
