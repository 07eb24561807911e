use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::PersonData;
use crate::domain::person::models::DateOfBirth;
use crate::domain::person::models::EmailAddress;
use crate::domain::person::models::Name;
use crate::domain::person::models::Password;
use crate::domain::person::models::RegisterPersonCommand;
use crate::domain::person::models::Username;
use crate::domain::person::ports::PersonServicePort;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;
use crate::person::errors::PersonError;

pub async fn register(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<ApiSuccess<PersonData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .person_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref person| {
            tracing::info!(request_id = %context.request_id, person_id = %person.id, "Person registered");
            ApiSuccess::new(StatusCode::CREATED, person.into())
        })
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    first_name: String,
    last_name: String,
    email_address: String,
    username: String,
    password: String,
    dob: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterPersonCommand, PersonError> {
        Ok(RegisterPersonCommand {
            first_name: Name::new(self.first_name)?,
            last_name: Name::new(self.last_name)?,
            email: EmailAddress::new(self.email_address)?,
            username: Username::new(self.username)?,
            password: Password::new(self.password)?,
            dob: DateOfBirth::parse(&self.dob)?,
        })
    }
}
