//! HTTP API for health reporting and user management

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use vitals_lib::{HealthReporter, ServiceMetrics, ServiceStatus, UserDraft, UserRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub reporter: HealthReporter,
    pub registry: UserRegistry,
    pub metrics: ServiceMetrics,
}

impl AppState {
    pub fn new(reporter: HealthReporter, registry: UserRegistry, metrics: ServiceMetrics) -> Self {
        Self {
            reporter,
            registry,
            metrics,
        }
    }
}

/// Service metadata for the root endpoint
async fn root() -> impl IntoResponse {
    Json(json!({
        "name": vitals_lib::SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "health_url": "/health",
        "users_url": "/api/users",
        "metrics_url": "/metrics",
    }))
}

/// Health report - returns 200 when the overall verdict is UP, 503 when DOWN
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let start = Instant::now();
    let report = state.reporter.report();

    state
        .metrics
        .observe_health_check_latency(start.elapsed().as_secs_f64());
    state.metrics.inc_health_checks(report.status);

    let status_code = match report.status {
        ServiceStatus::Up => StatusCode::OK,
        ServiceStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(report))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// List all users
async fn list_users(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.registry.list_all().await)
}

/// Get a single user - 404 with empty body when absent
async fn get_user(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Response {
    match state.registry.get_by_id(id).await {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Create a user - 201 with the stored record, 400 on constraint violations
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<UserDraft>,
) -> Response {
    if let Err(err) = draft.validate() {
        return validation_failure(err);
    }

    let user = state.registry.create(draft).await;
    state.metrics.inc_user_mutations();
    state
        .metrics
        .set_users_registered(state.registry.count().await as i64);

    (StatusCode::CREATED, Json(user)).into_response()
}

/// Update a user - 200 with the stored record, 400 on constraint
/// violations, 404 when the id is unknown
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(draft): Json<UserDraft>,
) -> Response {
    if let Err(err) = draft.validate() {
        return validation_failure(err);
    }

    match state.registry.update(id, draft).await {
        Some(user) => {
            state.metrics.inc_user_mutations();
            (StatusCode::OK, Json(user)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Delete a user - 204 empty body, 404 when the id is unknown
async fn delete_user(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Response {
    if state.registry.delete(id).await {
        state.metrics.inc_user_mutations();
        state
            .metrics
            .set_users_registered(state.registry.count().await as i64);
        StatusCode::NO_CONTENT.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

fn validation_failure(err: vitals_lib::ValidationError) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() }))).into_response()
}

/// Log method, path, status, and latency for every request
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
