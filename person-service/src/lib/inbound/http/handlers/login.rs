use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use crate::domain::person::models::AuthToken;
use crate::domain::person::models::LoginCommand;
use crate::domain::person::ports::PersonServicePort;
use crate::inbound::http::middleware::RequestContext;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let command = LoginCommand {
        identifier: body.username,
        password: body.password,
    };

    state
        .person_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|token| {
            tracing::info!(request_id = %context.request_id, person_id = %token.subject, "Token issued");
            ApiSuccess::new(StatusCode::OK, token.into())
        })
}

/// `username` accepts either the username or the email address.
#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub access_token: String,
    pub expires_in: i64,
    pub sub: String,
}

impl From<AuthToken> for LoginResponseData {
    fn from(token: AuthToken) -> Self {
        Self {
            access_token: token.access_token,
            expires_in: token.expires_in,
            sub: token.subject.to_string(),
        }
    }
}
