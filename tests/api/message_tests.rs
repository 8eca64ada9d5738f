//! Message API Tests

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-an-image";

fn messages_uri(room: &str) -> String {
    format!("/chatrooms/{}/messages", room)
}

async fn list(app: &TestApp, room: &str, token: &str) -> Vec<Value> {
    let response = app.get(&messages_uri(room), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await.as_array().unwrap().clone()
}

fn timestamp(message: &Value) -> DateTime<Utc> {
    message["timestamp"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_outsider_then_participant_with_image() {
    let app = TestApp::new();
    let alice = app.user().await;
    let bob = app.user().await;

    let response = app
        .post("/chatrooms", json!({"name": unique_room(), "public": false}), &alice.access)
        .await;
    let room = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .post(&messages_uri(&room), json!({"content": "hi"}), &alice.access)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let hi = body_json(response).await;
    assert_eq!(hi["type"], "text");
    assert_eq!(hi["content"], "hi");
    assert_eq!(hi["sender_id"], alice.id.as_str());
    assert!(hi["file_url"].is_null());

    let response = app
        .post(&messages_uri(&room), json!({"content": "let me in"}), &bob.access)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    app.add_participant(&room, &alice, &bob).await;

    let response = app
        .post_multipart(
            &messages_uri(&room),
            &[("type", "image")],
            Some(("cat.png", "image/png", PNG_BYTES)),
            &bob.access,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let image = body_json(response).await;
    assert_eq!(image["type"], "image");
    assert_eq!(image["file_type"], "image/png");
    let url = image["file_url"].as_str().unwrap();
    assert!(url.starts_with(BLOB_BASE_URL));
    assert_eq!(app.blobs.len(), 1);

    let messages = list(&app, &room, &alice.access).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["id"], hi["id"]);
    assert_eq!(messages[1]["id"], image["id"]);
}

#[tokio::test]
async fn test_json_attachment_type_follows_mime() {
    let app = TestApp::new();
    let alice = app.user().await;
    let room = app.room(&alice, &unique_room()).await;

    let response = app
        .post(
            &messages_uri(&room),
            json!({
                "content": "the report",
                "file_data": STANDARD.encode(b"%PDF-1.4 body"),
                "file_name": "report.pdf",
            }),
            &alice.access,
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let message = body_json(response).await;
    assert_eq!(message["type"], "file");
    assert_eq!(message["file_type"], "application/pdf");
    assert_eq!(message["content"], "the report");
    assert!(message["file_url"].as_str().unwrap().ends_with(".pdf"));
}

#[tokio::test]
async fn test_storage_outage_creates_no_message() {
    let app = TestApp::new();
    let alice = app.user().await;
    let room = app.room(&alice, &unique_room()).await;
    app.blobs.set_available(false);

    let response = app
        .post_multipart(
            &messages_uri(&room),
            &[("type", "image")],
            Some(("cat.png", "image/png", PNG_BYTES)),
            &alice.access,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "upload_failed");
    assert!(list(&app, &room, &alice.access).await.is_empty());
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_non_participant_cannot_post() {
    let app = TestApp::new();
    let alice = app.user().await;
    let mallory = app.user().await;
    let room = app.room(&alice, &unique_room()).await;

    let response = app
        .post_multipart(
            &messages_uri(&room),
            &[("content", "sneaky")],
            Some(("x.png", "image/png", PNG_BYTES)),
            &mallory.access,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.blobs.is_empty());
    assert!(list(&app, &room, &alice.access).await.is_empty());

    let response = app.get(&messages_uri(&room), &mallory.access).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_messages_are_rejected() {
    let app = TestApp::new();
    let alice = app.user().await;
    let room = app.room(&alice, &unique_room()).await;
    let uri = messages_uri(&room);

    let cases = [
        json!({}),
        json!({"content": "   "}),
        json!({"type": "image"}),
        json!({"content": "hi", "type": "video"}),
        json!({"content": "x".repeat(4001)}),
        json!({"file_data": "%%% not base64"}),
        json!({"file_data": STANDARD.encode(vec![0u8; MAX_UPLOAD_BYTES + 1]), "file_name": "big.bin"}),
    ];

    for case in cases {
        let response = app.post(&uri, case.clone(), &alice.access).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "case: {}", case);
    }

    assert!(list(&app, &room, &alice.access).await.is_empty());
    assert!(app.blobs.is_empty());
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let app = TestApp::new();
    let alice = app.user().await;

    let response = app
        .post(&messages_uri("123456789"), json!({"content": "hi"}), &alice.access)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get(&messages_uri("123456789"), &alice.access).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_appends_are_ordered() {
    let app = TestApp::new();
    let alice = app.user().await;
    let bob = app.user().await;
    let room = app.room(&alice, &unique_room()).await;
    app.add_participant(&room, &alice, &bob).await;
    let uri = messages_uri(&room);

    let posts = (0..20).map(|i| {
        let sender = if i % 2 == 0 { &alice } else { &bob };
        app.post(&uri, json!({"content": format!("message {}", i)}), &sender.access)
    });
    let responses = join_all(posts).await;
    assert!(responses.iter().all(|r| r.status() == StatusCode::CREATED));

    let messages = list(&app, &room, &alice.access).await;
    assert_eq!(messages.len(), 20);
    for pair in messages.windows(2) {
        assert!(timestamp(&pair[0]) <= timestamp(&pair[1]));
    }

    // The detail view embeds the same ordered log
    let detail = body_json(app.get(&format!("/chatrooms/{}", room), &bob.access).await).await;
    assert_eq!(detail["messages"], Value::Array(messages));
}

#[tokio::test]
async fn test_cursor_pagination() {
    let app = TestApp::new();
    let alice = app.user().await;
    let room = app.room(&alice, &unique_room()).await;
    let uri = messages_uri(&room);

    for i in 0..5 {
        let response = app
            .post(&uri, json!({"content": format!("m{}", i)}), &alice.access)
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let all = list(&app, &room, &alice.access).await;

    let response = app.get(&format!("{}?limit=2", uri), &alice.access).await;
    let first = body_json(response).await;
    assert_eq!(first.as_array().unwrap().as_slice(), &all[..2]);

    let cursor = first[1]["id"].as_str().unwrap();
    let response = app
        .get(&format!("{}?after={}&limit=2", uri, cursor), &alice.access)
        .await;
    let second = body_json(response).await;
    assert_eq!(second.as_array().unwrap().as_slice(), &all[2..4]);

    let response = app.get(&format!("{}?after=abc", uri), &alice.access).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
