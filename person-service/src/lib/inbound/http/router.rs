use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::connect::connect;
use super::handlers::disconnect::disconnect;
use super::handlers::get_person::get_person;
use super::handlers::list_connections::list_connections;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::update_person::update_person;
use super::metrics::metrics_handler;
use super::metrics::track_metrics;
use super::metrics::PrometheusMetrics;
use super::middleware::authenticate;
use super::middleware::request_id;
use crate::domain::connection::ports::ConnectionServicePort;
use crate::domain::person::ports::PersonServicePort;

#[derive(Clone)]
pub struct AppState {
    pub person_service: Arc<dyn PersonServicePort>,
    pub connection_service: Arc<dyn ConnectionServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(state: AppState, metrics: Arc<PrometheusMetrics>) -> Router {
    let public_routes = Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login));

    let protected_routes = Router::new()
        .route(
            "/api/v1/auth/persons/:person_id",
            get(get_person).patch(update_person),
        )
        .route(
            "/api/v1/auth/persons/:person_id/password",
            put(change_password),
        )
        .route(
            "/api/v1/connections",
            get(list_connections).post(connect).delete(disconnect),
        )
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.authenticator),
            authenticate,
        ));

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(Arc::clone(&metrics));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(metrics_routes)
        .route_layer(middleware::from_fn_with_state(metrics, track_metrics))
        .layer(middleware::from_fn(request_id))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
}
