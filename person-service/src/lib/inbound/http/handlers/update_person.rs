use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ensure_owner;
use super::parse_person_id;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::PersonData;
use crate::domain::person::models::DateOfBirth;
use crate::domain::person::models::Name;
use crate::domain::person::models::UpdateProfileCommand;
use crate::domain::person::ports::PersonServicePort;
use crate::inbound::http::middleware::AuthenticatedPerson;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;
use crate::person::errors::PersonError;

/// Name and date of birth only; email, username and password are immutable here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePersonRequest {
    first_name: String,
    last_name: String,
    dob: String,
}

impl UpdatePersonRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, PersonError> {
        Ok(UpdateProfileCommand {
            first_name: Name::new(self.first_name)?,
            last_name: Name::new(self.last_name)?,
            dob: DateOfBirth::parse(&self.dob)?,
        })
    }
}

pub async fn update_person(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedPerson>,
    Extension(context): Extension<RequestContext>,
    Path(person_id): Path<String>,
    JsonBody(body): JsonBody<UpdatePersonRequest>,
) -> Result<ApiSuccess<PersonData>, ApiError> {
    let person_id = parse_person_id(&person_id)?;
    ensure_owner(&actor.person_id, &person_id)?;
    let command = body.try_into_command()?;

    state
        .person_service
        .update_profile(&person_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref person| {
            tracing::info!(request_id = %context.request_id, person_id = %person.id, "Profile updated");
            ApiSuccess::new(StatusCode::OK, person.into())
        })
}
