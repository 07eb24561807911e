use std::sync::Arc;

use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::person::models::PersonId;
use crate::inbound::http::handlers::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Identity bound into request extensions once the bearer token verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedPerson {
    pub person_id: PersonId,
}

/// Per-request context; handlers tag their audit lines with its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Uuid,
}

/// Assigns a time-ordered request id, exposes it as [`RequestContext`] and
/// echoes it in the `x-request-id` response header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::now_v7();
    req.extensions_mut().insert(RequestContext { request_id });

    let mut response = next
        .run(req)
        .instrument(tracing::info_span!("request", request_id = %request_id))
        .await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Request gate: rejects calls without a valid bearer token and binds the
/// verified subject as [`AuthenticatedPerson`].
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req)
        .ok_or_else(|| ApiError::Unauthorized("missing token".to_string()).into_response())?;

    let subject = authenticator.verify_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token verification failed");
        ApiError::Unauthorized("invalid/expired token".to_string()).into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedPerson {
        person_id: PersonId(subject),
    });

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
