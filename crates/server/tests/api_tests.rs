//! Integration tests for the server API endpoints

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use vitals_lib::{HealthReporter, ServiceMetrics, ServiceStatus, UserDraft, UserRegistry};

#[derive(Clone)]
pub struct AppState {
    pub reporter: HealthReporter,
    pub registry: UserRegistry,
    pub metrics: ServiceMetrics,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.reporter.report();
    state.metrics.inc_health_checks(report.status);

    let status_code = match report.status {
        ServiceStatus::Up => StatusCode::OK,
        ServiceStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(report))
}

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

async fn list_users(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.registry.list_all().await)
}

async fn get_user(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Response {
    match state.registry.get_by_id(id).await {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_user(State(state): State<Arc<AppState>>, Json(draft): Json<UserDraft>) -> Response {
    if let Err(err) = draft.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() })))
            .into_response();
    }
    let user = state.registry.create(draft).await;
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(draft): Json<UserDraft>,
) -> Response {
    if let Err(err) = draft.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() })))
            .into_response();
    }
    match state.registry.update(id, draft).await {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_user(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> Response {
    if state.registry.delete(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}

fn setup_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        reporter: HealthReporter::new(),
        registry: UserRegistry::new(),
        metrics: ServiceMetrics::new(),
    });
    let router = create_test_router(state.clone());

    (router, state)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_returns_report_shape() {
    let (app, _state) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status_code = response.status();
    let report = body_json(response).await;

    assert_eq!(report["service"], "vitals");
    assert!(report["timestamp"].is_string());
    assert!(report["message"].is_string());

    // the HTTP code must agree with the verdict in the body
    match report["status"].as_str().unwrap() {
        "UP" => {
            assert_eq!(status_code, StatusCode::OK);
            assert_eq!(report["system"]["memory"]["status"], "healthy");
            assert_eq!(report["system"]["disk"]["status"], "healthy");
            assert!(report["system"]["cpu"]["availableProcessors"].as_u64().unwrap() >= 1);
            assert!(report["system"]["os"]["systemLoadAverage"].is_string());
            assert!(report["system"]["runtime"]["uptime"].is_string());
        }
        "DOWN" => {
            assert_eq!(status_code, StatusCode::SERVICE_UNAVAILABLE);
        }
        other => panic!("unexpected status {other}"),
    }
}

#[tokio::test]
async fn test_list_users_returns_seeds() {
    let (app, _state) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let users = body_json(response).await;
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert_eq!(users[0]["id"], 1);
    assert_eq!(users[0]["name"], "John Doe");
    assert_eq!(users[1]["id"], 2);
    assert_eq!(users[1]["email"], "jane.smith@example.com");
}

#[tokio::test]
async fn test_get_user_found_and_missing() {
    let (app, _state) = setup_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "John Doe");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_user_assigns_id() {
    let (app, state) = setup_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users",
            r#"{"name": "Alice", "email": "alice@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["id"], 3);
    assert_eq!(created["name"], "Alice");
    assert_eq!(state.registry.count().await, 3);
}

#[tokio::test]
async fn test_create_user_rejects_invalid_payloads() {
    let (app, state) = setup_test_app();

    for body in [
        r#"{"name": "", "email": "a@x.com"}"#,
        r#"{"name": "A", "email": "a@x.com"}"#,
        r#"{"name": "Alice", "email": "not-an-email"}"#,
        r#"{"name": "Alice", "email": ""}"#,
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/users", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
    }

    // no mutation reached the registry
    assert_eq!(state.registry.count().await, 2);
}

#[tokio::test]
async fn test_update_user_preserves_path_id() {
    let (app, _state) = setup_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/users/1",
            r#"{"name": "Updated Name", "email": "updated@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["name"], "Updated Name");
}

#[tokio::test]
async fn test_update_missing_user_returns_404() {
    let (app, state) = setup_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/users/999",
            r#"{"name": "Ghost", "email": "ghost@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.registry.count().await, 2);
}

#[tokio::test]
async fn test_delete_user_then_404_on_repeat() {
    let (app, _state) = setup_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/users/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/users/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let (app, state) = setup_test_app();

    state.metrics.observe_health_check_latency(0.001);
    state.metrics.set_users_registered(2);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("vitals_health_check_latency_seconds"));
    assert!(metrics_text.contains("vitals_users_registered"));
}
