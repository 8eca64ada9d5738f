//! Authentication API Tests

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_register_with_valid_data() {
    let app = TestApp::new();

    let response = app.register(&unique_email()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User registered successfully");
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new();
    let cases = [
        json!({"email": "not-an-email", "password": PASSWORD, "confirmPassword": PASSWORD}),
        json!({"email": unique_email(), "password": "short", "confirmPassword": "short"}),
        json!({"email": unique_email(), "password": PASSWORD, "confirmPassword": "Different123!"}),
    ];

    for case in cases {
        let response = app.json(Method::POST, "/register", Some(case), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_malformed_auth_bodies_are_bad_requests() {
    let app = TestApp::new();
    let cases = [
        ("/register", json!({"email": unique_email(), "password": PASSWORD})),
        (
            "/register",
            json!({"email": unique_email(), "password": 12345678, "confirmPassword": PASSWORD}),
        ),
        ("/login", json!({"email": unique_email()})),
        ("/token/refresh", json!({})),
    ];

    for (uri, case) in cases {
        let response = app.json(Method::POST, uri, Some(case), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_register_with_duplicate_email_fails() {
    let app = TestApp::new();
    let email = unique_email();

    assert_eq!(app.register(&email).await.status(), StatusCode::CREATED);
    let response = app.register(&email).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_returns_tokens() {
    let app = TestApp::new();
    let email = unique_email();
    app.register(&email).await;

    let response = app
        .json(
            Method::POST,
            "/login",
            Some(json!({"email": email, "password": PASSWORD})),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Login successful");
    assert!(body["user_id"].as_str().unwrap().parse::<i64>().is_ok());
    assert!(!body["username"].as_str().unwrap().is_empty());
    assert!(!body["access"].as_str().unwrap().is_empty());
    assert!(!body["refresh"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_with_invalid_credentials_fails() {
    let app = TestApp::new();
    let email = unique_email();
    app.register(&email).await;

    for (email, password) in [(email.as_str(), "WrongPassword123!"), ("nobody@example.com", PASSWORD)] {
        let response = app
            .json(
                Method::POST,
                "/login",
                Some(json!({"email": email, "password": password})),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_refresh_issues_usable_access_token() {
    let app = TestApp::new();
    let user = app.user().await;

    let response = app
        .json(
            Method::POST,
            "/token/refresh",
            Some(json!({"refresh": user.refresh})),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let access = body_json(response).await["access"].as_str().unwrap().to_string();

    assert_eq!(app.get("/chatrooms", &access).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_access_token_is_not_a_refresh_token() {
    let app = TestApp::new();
    let user = app.user().await;

    let response = app
        .json(
            Method::POST,
            "/token/refresh",
            Some(json!({"refresh": user.access})),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // and the refresh token does not authenticate requests
    assert_eq!(
        app.get("/chatrooms", &user.refresh).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();

    let response = app.json(Method::GET, "/chatrooms", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.get("/chatrooms", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_read_and_update() {
    let app = TestApp::new();
    let user = app.user().await;

    let response = app.get("/users/me/profile", &user.access).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user_id"], user.id.as_str());
    assert!(body["bio"].is_null());

    let response = app
        .json(
            Method::PATCH,
            "/users/me/profile",
            Some(json!({"bio": "Hello there", "avatar_url": "https://img.test/a.png"})),
            Some(&user.access),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bio"], "Hello there");
    assert_eq!(body["avatar_url"], "https://img.test/a.png");

    let response = app
        .json(
            Method::PATCH,
            "/users/me/profile",
            Some(json!({"avatar_url": "not a url"})),
            Some(&user.access),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
