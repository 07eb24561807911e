use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::parse_person_id;
use super::ApiError;
use super::ApiSuccess;
use super::PersonData;
use crate::domain::person::ports::PersonServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_person(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
) -> Result<ApiSuccess<PersonData>, ApiError> {
    let person_id = parse_person_id(&person_id)?;

    state
        .person_service
        .get_profile(&person_id)
        .await
        .map_err(ApiError::from)
        .map(|ref person| ApiSuccess::new(StatusCode::OK, person.into()))
}
