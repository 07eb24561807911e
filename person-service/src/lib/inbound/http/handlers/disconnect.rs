use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::connect::ConnectionRequest;
use super::parse_person_id;
use super::ApiError;
use super::JsonBody;
use crate::domain::connection::ports::ConnectionServicePort;
use crate::inbound::http::middleware::AuthenticatedPerson;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;

pub async fn disconnect(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedPerson>,
    Extension(context): Extension<RequestContext>,
    JsonBody(body): JsonBody<ConnectionRequest>,
) -> Result<StatusCode, ApiError> {
    let target = parse_person_id(&body.connection_to)?;

    state
        .connection_service
        .disconnect(&actor.person_id, &target)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            tracing::info!(
                request_id = %context.request_id,
                person_id = %actor.person_id,
                target = %target,
                "Connection removed"
            );
            StatusCode::NO_CONTENT
        })
}
