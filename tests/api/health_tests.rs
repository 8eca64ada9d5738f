//! Health Check API Tests

use axum::http::{header, Method, StatusCode};
use pretty_assertions::assert_eq;

use crate::common::*;

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.json(Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_without_database() {
    let app = TestApp::new();

    let response = app.json(Method::GET, "/health/ready", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["message"], "in-memory storage");
}

#[tokio::test]
async fn test_cron_says_happy() {
    let app = TestApp::new();

    let response = app.json(Method::GET, "/cron", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(body_text(response).await, "Happy");
}

#[tokio::test]
async fn test_metrics_exposed() {
    let app = TestApp::new();
    app.json(Method::GET, "/health", None, None).await;

    let response = app.json(Method::GET, "/metrics", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("roomchat_http_requests_total"));
}
