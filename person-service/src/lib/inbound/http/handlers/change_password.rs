use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ensure_owner;
use super::parse_person_id;
use super::ApiError;
use super::JsonBody;
use crate::domain::person::models::ChangePasswordCommand;
use crate::domain::person::models::Password;
use crate::domain::person::ports::PersonServicePort;
use crate::inbound::http::middleware::AuthenticatedPerson;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;
use crate::person::errors::PersonError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedPerson>,
    Extension(context): Extension<RequestContext>,
    Path(person_id): Path<String>,
    JsonBody(body): JsonBody<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let person_id = parse_person_id(&person_id)?;
    ensure_owner(&actor.person_id, &person_id)?;

    let command = ChangePasswordCommand {
        current_password: body.current_password,
        new_password: Password::new(body.new_password).map_err(PersonError::from)?,
    };

    state
        .person_service
        .change_password(&person_id, command)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            tracing::info!(request_id = %context.request_id, person_id = %person_id, "Password changed");
            StatusCode::NO_CONTENT
        })
}
