//! Common Test Utilities
//!
//! The full router over the in-memory backend and a process-local blob store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use roomchat::config::{
    ChatSettings, CorsSettings, DatabaseSettings, JwtSettings, ServerSettings, Settings,
    SnowflakeSettings, StorageBackend, StorageSettings,
};
use roomchat::infrastructure::storage::MemoryBlobStore;
use roomchat::shared::snowflake::DEFAULT_EPOCH;
use roomchat::startup::{build_router, AppState, Repositories};

pub const PASSWORD: &str = "ValidPassword123!";
pub const BLOB_BASE_URL: &str = "https://files.test";
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

pub fn test_settings(public_rooms_readable: bool) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseSettings {
            url: None,
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: 1,
            run_migrations: false,
        },
        jwt: JwtSettings {
            secret: "integration-test-secret-that-is-long-enough".into(),
            access_token_expiry_minutes: 60,
            refresh_token_expiry_days: 1,
        },
        snowflake: SnowflakeSettings {
            machine_id: 1,
            epoch: DEFAULT_EPOCH,
        },
        storage: StorageSettings {
            backend: StorageBackend::Memory,
            bucket: "test".into(),
            region: "us-east-1".into(),
            endpoint: None,
            public_base_url: Some(BLOB_BASE_URL.into()),
            access_key_id: None,
            secret_access_key: None,
            upload_timeout_secs: 5,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        },
        cors: CorsSettings {
            allowed_origins: vec!["http://localhost:8081".into()],
        },
        chat: ChatSettings {
            public_rooms_readable,
        },
        environment: "test".into(),
    }
}

/// Logged-in test user
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub access: String,
    pub refresh: String,
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub blobs: Arc<MemoryBlobStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(test_settings(false))
    }

    pub fn with_settings(settings: Settings) -> Self {
        let blobs = Arc::new(MemoryBlobStore::new(BLOB_BASE_URL));
        let state = AppState::new(settings, None, Repositories::in_memory(), blobs.clone());
        Self {
            router: build_router(state),
            blobs,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// JSON request, authenticated when a token is given
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response {
        self.json(Method::GET, uri, None, Some(token)).await
    }

    pub async fn post(&self, uri: &str, body: Value, token: &str) -> Response {
        self.json(Method::POST, uri, Some(body), Some(token)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Response {
        self.json(Method::DELETE, uri, None, Some(token)).await
    }

    /// Multipart message post. `file` is `(filename, content type, bytes)`.
    pub async fn post_multipart(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
        token: &str,
    ) -> Response {
        const BOUNDARY: &str = "roomchat-test-boundary";
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&self, email: &str) -> Response {
        self.json(
            Method::POST,
            "/register",
            Some(json!({
                "email": email,
                "password": PASSWORD,
                "confirmPassword": PASSWORD,
            })),
            None,
        )
        .await
    }

    /// Register and log in a fresh user
    pub async fn user(&self) -> TestUser {
        let email = unique_email();
        assert_eq!(self.register(&email).await.status(), StatusCode::CREATED);

        let response = self
            .json(
                Method::POST,
                "/login",
                Some(json!({"email": email, "password": PASSWORD})),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;

        TestUser {
            id: body["user_id"].as_str().unwrap().to_string(),
            email,
            access: body["access"].as_str().unwrap().to_string(),
            refresh: body["refresh"].as_str().unwrap().to_string(),
        }
    }

    /// Create a room owned by `owner`, returning its id
    pub async fn room(&self, owner: &TestUser, name: &str) -> String {
        let response = self
            .post("/chatrooms", json!({"name": name}), &owner.access)
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }

    pub async fn add_participant(&self, room_id: &str, admin: &TestUser, user: &TestUser) {
        let response = self
            .post(
                &format!("/chatrooms/{}/participants", room_id),
                json!({"user_id": user.id}),
                &admin.access,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Generate a unique test email
pub fn unique_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}

/// Generate a unique room name
pub fn unique_room() -> String {
    format!("room-{}", &uuid::Uuid::new_v4().to_string()[..8])
}
