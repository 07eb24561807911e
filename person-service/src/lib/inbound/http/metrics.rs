//! Prometheus metrics: HTTP request counters and latency histograms, use-case
//! operation counters and latency histograms, and the `/metrics` exposition.

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::extract::State;
use axum::http::header;
use axum::http::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;

use crate::domain::metrics::OperationOutcome;
use crate::domain::metrics::ServiceMetrics;

const LATENCY_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpRequestLabels {
    pub method: String,
    pub route: String,
    pub status: u16,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OperationLabels {
    pub operation: String,
    pub outcome: String,
}

fn latency_histogram() -> Histogram {
    Histogram::new(LATENCY_BUCKETS.into_iter())
}

/// Owns every metric family and the registry they are exposed through.
///
/// Created once by the composition root and shared behind an `Arc`.
pub struct PrometheusMetrics {
    registry: Registry,
    http_requests_total: Family<HttpRequestLabels, Counter>,
    http_request_duration_seconds: Family<HttpRequestLabels, Histogram>,
    operations_total: Family<OperationLabels, Counter>,
    operation_duration_seconds: Family<OperationLabels, Histogram>,
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let http_requests_total: Family<HttpRequestLabels, Counter> = Family::default();
        let http_request_duration_seconds: Family<HttpRequestLabels, Histogram> =
            Family::new_with_constructor(latency_histogram);
        let operations_total: Family<OperationLabels, Counter> = Family::default();
        let operation_duration_seconds: Family<OperationLabels, Histogram> =
            Family::new_with_constructor(latency_histogram);

        registry.register(
            "http_requests",
            "Total number of HTTP requests",
            http_requests_total.clone(),
        );
        registry.register(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
            http_request_duration_seconds.clone(),
        );
        registry.register(
            "person_operations",
            "Total number of person and connection operations",
            operations_total.clone(),
        );
        registry.register(
            "person_operation_duration_seconds",
            "Person and connection operation duration in seconds",
            operation_duration_seconds.clone(),
        );

        Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            operations_total,
            operation_duration_seconds,
        }
    }

    pub fn record_request(&self, labels: &HttpRequestLabels, elapsed: Duration) {
        self.http_requests_total.get_or_create(labels).inc();
        self.http_request_duration_seconds
            .get_or_create(labels)
            .observe(elapsed.as_secs_f64());
    }

    /// Render all families in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buf = String::new();
        prometheus_client::encoding::text::encode(&mut buf, &self.registry)?;
        Ok(buf)
    }
}

impl Default for PrometheusMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics for PrometheusMetrics {
    fn record_operation(&self, operation: &'static str, outcome: OperationOutcome, elapsed: Duration) {
        let labels = OperationLabels {
            operation: operation.to_string(),
            outcome: outcome.as_str().to_string(),
        };
        self.operations_total.get_or_create(&labels).inc();
        self.operation_duration_seconds
            .get_or_create(&labels)
            .observe(elapsed.as_secs_f64());
    }
}

/// Records one counter increment and one latency observation per request.
///
/// The route label is the matched pattern, so path parameters never
/// multiply label cardinality.
pub async fn track_metrics(
    State(metrics): State<Arc<PrometheusMetrics>>,
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let route = matched_path
        .as_ref()
        .map_or_else(|| "unmatched".to_string(), |m| m.as_str().to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    let labels = HttpRequestLabels {
        method,
        route,
        status: response.status().as_u16(),
    };
    metrics.record_request(&labels, started.elapsed());

    response
}

pub async fn metrics_handler(State(metrics): State<Arc<PrometheusMetrics>>) -> Response {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
        }
    }
}
