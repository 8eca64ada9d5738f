//! Chat Room API Tests

use axum::http::{Method, StatusCode};
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::*;

fn ids(room: &Value, field: &str) -> Vec<String> {
    room[field]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_creator_is_admin_and_participant() {
    let app = TestApp::new();
    let alice = app.user().await;

    let response = app
        .post(
            "/chatrooms",
            json!({"name": "Alpha", "description": "first room"}),
            &alice.access,
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let room = body_json(response).await;
    assert_eq!(room["name"], "Alpha");
    assert_eq!(room["description"], "first room");
    assert_eq!(room["public"], false);
    assert_eq!(room["admin_id"], alice.id.as_str());
    assert_eq!(ids(&room, "participants"), vec![alice.id.clone()]);
    assert!(ids(&room, "moderators").is_empty());
}

#[tokio::test]
async fn test_duplicate_room_name_is_rejected() {
    let app = TestApp::new();
    let alice = app.user().await;
    let bob = app.user().await;
    app.room(&alice, "Alpha").await;

    let response = app.post("/chatrooms", json!({"name": "Alpha"}), &bob.access).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_room_name_is_rejected() {
    let app = TestApp::new();
    let alice = app.user().await;

    for name in ["", "   "] {
        let response = app.post("/chatrooms", json!({"name": name}), &alice.access).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_malformed_room_bodies_are_bad_requests() {
    let app = TestApp::new();
    let alice = app.user().await;
    let room = app.room(&alice, &unique_room()).await;

    for body in [json!({}), json!({"name": 42}), json!({"description": "no name"})] {
        let response = app.post("/chatrooms", body, &alice.access).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"].is_string());
    }

    let response = app
        .post(&format!("/chatrooms/{}/participants", room), json!({}), &alice.access)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .json(
            Method::PATCH,
            &format!("/chatrooms/{}", room),
            Some(json!({"public": "yes"})),
            Some(&alice.access),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_only_shows_joined_rooms() {
    let app = TestApp::new();
    let alice = app.user().await;
    let bob = app.user().await;
    let alpha = app.room(&alice, &unique_room()).await;
    app.room(&bob, &unique_room()).await;

    let rooms = body_json(app.get("/chatrooms", &alice.access).await).await;
    let listed: Vec<&str> = rooms
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec![alpha.as_str()]);

    app.add_participant(&alpha, &alice, &bob).await;
    let rooms = body_json(app.get("/chatrooms", &bob.access).await).await;
    assert_eq!(rooms.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_room_detail_access() {
    let app = TestApp::new();
    let alice = app.user().await;
    let bob = app.user().await;
    let room = app.room(&alice, &unique_room()).await;

    let response = app.get(&format!("/chatrooms/{}", room), &alice.access).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["id"], room.as_str());
    assert_eq!(detail["messages"], json!([]));

    let response = app.get(&format!("/chatrooms/{}", room), &bob.access).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.get("/chatrooms/999999", &alice.access).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/chatrooms/not-a-number", &alice.access).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_rooms_readable_when_enabled() {
    let app = TestApp::with_settings(test_settings(true));
    let alice = app.user().await;
    let bob = app.user().await;

    let response = app
        .post("/chatrooms", json!({"name": unique_room(), "public": true}), &alice.access)
        .await;
    let room = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app.get(&format!("/chatrooms/{}", room), &bob.access).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Reading is allowed, posting still needs membership
    let response = app
        .post(
            &format!("/chatrooms/{}/messages", room),
            json!({"content": "hi"}),
            &bob.access,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // and the room is not listed for outsiders
    let rooms = body_json(app.get("/chatrooms", &bob.access).await).await;
    assert_eq!(rooms, json!([]));
}

#[tokio::test]
async fn test_roster_management_permissions() {
    let app = TestApp::new();
    let alice = app.user().await;
    let bob = app.user().await;
    let carol = app.user().await;
    let room = app.room(&alice, &unique_room()).await;
    app.add_participant(&room, &alice, &bob).await;

    // Plain participants cannot add others
    let response = app
        .post(
            &format!("/chatrooms/{}/participants", room),
            json!({"user_id": carol.id}),
            &bob.access,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Moderators can
    let response = app
        .post(
            &format!("/chatrooms/{}/moderators", room),
            json!({"user_id": bob.id}),
            &alice.access,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ids(&body_json(response).await, "moderators"), vec![bob.id.clone()]);

    let response = app
        .post(
            &format!("/chatrooms/{}/participants", room),
            json!({"user_id": carol.id}),
            &bob.access,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(ids(&body_json(response).await, "participants").contains(&carol.id));

    let response = app
        .delete(&format!("/chatrooms/{}/moderators/{}", room, bob.id), &alice.access)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(ids(&body_json(response).await, "moderators").is_empty());
}

#[tokio::test]
async fn test_admin_cannot_be_removed() {
    let app = TestApp::new();
    let alice = app.user().await;
    let room = app.room(&alice, &unique_room()).await;

    let response = app
        .delete(&format!("/chatrooms/{}/participants/{}", room, alice.id), &alice.access)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_removed_participant_loses_access() {
    let app = TestApp::new();
    let alice = app.user().await;
    let bob = app.user().await;
    let room = app.room(&alice, &unique_room()).await;
    app.add_participant(&room, &alice, &bob).await;

    let response = app
        .delete(&format!("/chatrooms/{}/participants/{}", room, bob.id), &alice.access)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ids(&body_json(response).await, "participants"), vec![alice.id.clone()]);

    let response = app.get(&format!("/chatrooms/{}", room), &bob.access).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_adding_unknown_user_is_not_found() {
    let app = TestApp::new();
    let alice = app.user().await;
    let room = app.room(&alice, &unique_room()).await;

    let response = app
        .post(
            &format!("/chatrooms/{}/participants", room),
            json!({"user_id": "424242"}),
            &alice.access,
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_roster_additions_are_not_lost() {
    let app = TestApp::new();
    let alice = app.user().await;
    let room = app.room(&alice, &unique_room()).await;

    let mut users = Vec::new();
    for _ in 0..8 {
        users.push(app.user().await);
    }

    let uri = format!("/chatrooms/{}/participants", room);
    let responses = join_all(
        users
            .iter()
            .map(|u| app.post(&uri, json!({"user_id": u.id}), &alice.access)),
    )
    .await;
    assert!(responses.iter().all(|r| r.status() == StatusCode::OK));

    let detail = body_json(app.get(&format!("/chatrooms/{}", room), &alice.access).await).await;
    let participants = ids(&detail, "participants");
    assert_eq!(participants.len(), 9);
    for user in &users {
        assert!(participants.contains(&user.id));
    }
}

fn updated_at(room: &Value) -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339(room["updated_at"].as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn test_admin_updates_room_settings() {
    let app = TestApp::new();
    let alice = app.user().await;
    let bob = app.user().await;
    let room = app.room(&alice, &unique_room()).await;
    app.add_participant(&room, &alice, &bob).await;
    let before = body_json(app.get(&format!("/chatrooms/{}", room), &alice.access).await).await;

    let name = unique_room();
    let response = app
        .json(
            Method::PATCH,
            &format!("/chatrooms/{}", room),
            Some(json!({"name": name, "description": "renamed", "public": true})),
            Some(&alice.access),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], name.as_str());
    assert_eq!(updated["description"], "renamed");
    assert_eq!(updated["public"], true);
    assert!(updated_at(&updated) > updated_at(&before));
    assert_eq!(ids(&updated, "participants").len(), 2);

    // PUT behaves the same; omitted fields are kept
    let response = app
        .json(
            Method::PUT,
            &format!("/chatrooms/{}", room),
            Some(json!({"description": ""})),
            Some(&alice.access),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], name.as_str());
    assert!(updated["description"].is_null());
    assert_eq!(updated["public"], true);
}

#[tokio::test]
async fn test_room_settings_permissions() {
    let app = TestApp::new();
    let alice = app.user().await;
    let bob = app.user().await;
    let carol = app.user().await;
    let room = app.room(&alice, &unique_room()).await;
    app.add_participant(&room, &alice, &bob).await;
    let uri = format!("/chatrooms/{}", room);

    let response = app
        .json(Method::PATCH, &uri, Some(json!({"public": true})), Some(&bob.access))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .json(Method::PATCH, &uri, Some(json!({"public": true})), Some(&carol.access))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    app.post(
        &format!("/chatrooms/{}/moderators", room),
        json!({"user_id": carol.id}),
        &alice.access,
    )
    .await;
    let response = app
        .json(Method::PATCH, &uri, Some(json!({"public": true})), Some(&carol.access))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["public"], true);
}

#[tokio::test]
async fn test_room_settings_validation() {
    let app = TestApp::new();
    let alice = app.user().await;
    let taken = unique_room();
    app.room(&alice, &taken).await;
    let room = app.room(&alice, &unique_room()).await;
    let uri = format!("/chatrooms/{}", room);

    for name in [taken.as_str(), "", "   "] {
        let response = app
            .json(Method::PATCH, &uri, Some(json!({"name": name})), Some(&alice.access))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{:?}", name);
    }

    let response = app
        .json(
            Method::PATCH,
            "/chatrooms/999999",
            Some(json!({"public": true})),
            Some(&alice.access),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
