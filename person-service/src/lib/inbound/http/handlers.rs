use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::connection::errors::ConnectionError;
use crate::domain::person::models::Person;
use crate::domain::person::models::PersonId;
use crate::person::errors::PersonError;

pub mod change_password;
pub mod connect;
pub mod disconnect;
pub mod get_person;
pub mod list_connections;
pub mod login;
pub mod register;
pub mod update_person;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// `Json` extractor whose rejections render as a 400 in the API envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl ApiError {
    /// Log the detail and hand the caller an opaque message.
    fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed");
        ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PersonError> for ApiError {
    fn from(err: PersonError) -> Self {
        match err {
            PersonError::InvalidPersonId(_)
            | PersonError::InvalidUsername(_)
            | PersonError::InvalidEmail(_)
            | PersonError::InvalidName(_)
            | PersonError::InvalidPassword(_)
            | PersonError::InvalidDateOfBirth(_)
            | PersonError::InvalidStatus(_) => ApiError::UnprocessableEntity(err.to_string()),
            PersonError::AlreadyExists { .. } => ApiError::Conflict(err.to_string()),
            PersonError::NotFound(_) => ApiError::NotFound("Person not found".to_string()),
            PersonError::IncorrectCredentials => ApiError::Unauthorized(err.to_string()),
            PersonError::CorruptedPasswordHash(_)
            | PersonError::Hashing(_)
            | PersonError::Token(_)
            | PersonError::DatabaseError(_)
            | PersonError::Unknown(_) => ApiError::internal(err),
        }
    }
}

impl From<ConnectionError> for ApiError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::SelfConnection => ApiError::UnprocessableEntity(err.to_string()),
            ConnectionError::TargetNotFound(_) => ApiError::NotFound(err.to_string()),
            ConnectionError::DatabaseError(_) => ApiError::internal(err),
        }
    }
}

/// Only the bound identity may act on its own profile.
fn ensure_owner(actor: &PersonId, target: &PersonId) -> Result<(), ApiError> {
    if actor == target {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Operation not allowed on another person's profile".to_string(),
        ))
    }
}

fn parse_person_id(raw: &str) -> Result<PersonId, ApiError> {
    PersonId::from_string(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public profile projection. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub username: String,
    pub dob: String,
    pub datetime_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl From<&Person> for PersonData {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.to_string(),
            first_name: person.first_name.as_str().to_string(),
            last_name: person.last_name.as_str().to_string(),
            email_address: person.email.as_str().to_string(),
            username: person.username.as_str().to_string(),
            dob: person.dob.to_string(),
            datetime_created: person.created_at,
            last_modified: person.last_modified,
        }
    }
}
