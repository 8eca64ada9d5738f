//! Chat Room Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateRoomRequest, RosterRequest, UpdateRoomRequest};
use crate::application::services::RoomUpdate;
use crate::application::dto::response::{RoomDetailResponse, RoomResponse};
use crate::domain::ChatRoom;
use crate::presentation::http::extractors::ApiJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::{parse_id, validation_error};
use crate::startup::AppState;

/// Load a room the caller may view
pub(super) async fn viewable_room(
    state: &AppState,
    room_id: i64,
    user_id: i64,
) -> Result<ChatRoom, AppError> {
    let room = state.rooms.get_room(room_id).await?;
    if !state.policy.can_view(&room, user_id) {
        return Err(AppError::Forbidden(
            "You are not a member of this room".into(),
        ));
    }
    Ok(room)
}

/// Only the admin or a moderator may change the roster
async fn authorize_roster(state: &AppState, room_id: i64, user_id: i64) -> Result<(), AppError> {
    let room = state.rooms.get_room(room_id).await?;
    if !state.policy.can_manage_roster(&room, user_id) {
        return Err(AppError::Forbidden(
            "Only the room admin or a moderator can manage the roster".into(),
        ));
    }
    Ok(())
}

/// List rooms the caller participates in
pub async fn list_rooms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<RoomResponse>>, AppError> {
    let rooms = state.rooms.list_visible_rooms(auth.user_id).await?;
    Ok(Json(rooms.into_iter().map(RoomResponse::from).collect()))
}

/// Create a room owned by the caller
pub async fn create_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let room = state
        .rooms
        .create_room(auth.user_id, &body.name, body.description, body.public)
        .await?;

    Ok((StatusCode::CREATED, Json(room.into())))
}

/// Room detail with its ordered messages
pub async fn get_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailResponse>, AppError> {
    let room_id = parse_id(&room_id, "room")?;
    viewable_room(&state, room_id, auth.user_id).await?;

    let detail = state.rooms.get_room_detail(room_id).await?;
    Ok(Json(detail.into()))
}

/// Rename the room or change its description or visibility
pub async fn update_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
    ApiJson(body): ApiJson<UpdateRoomRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let room_id = parse_id(&room_id, "room")?;
    body.validate().map_err(validation_error)?;

    let room = state.rooms.get_room(room_id).await?;
    if !state.policy.can_update_settings(&room, auth.user_id) {
        return Err(AppError::Forbidden(
            "Only the room admin or a moderator can change room settings".into(),
        ));
    }

    let update = RoomUpdate {
        name: body.name,
        description: body.description,
        is_public: body.public,
    };
    let room = state.rooms.update_room(room_id, update).await?;
    Ok(Json(room.into()))
}

pub async fn add_participant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
    ApiJson(body): ApiJson<RosterRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let room_id = parse_id(&room_id, "room")?;
    authorize_roster(&state, room_id, auth.user_id).await?;

    let room = state.rooms.add_participant(room_id, body.user_id).await?;
    Ok(Json(room.into()))
}

pub async fn remove_participant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((room_id, user_id)): Path<(String, String)>,
) -> Result<Json<RoomResponse>, AppError> {
    let room_id = parse_id(&room_id, "room")?;
    let user_id = parse_id(&user_id, "user")?;
    authorize_roster(&state, room_id, auth.user_id).await?;

    let room = state.rooms.remove_participant(room_id, user_id).await?;
    Ok(Json(room.into()))
}

pub async fn promote_moderator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
    ApiJson(body): ApiJson<RosterRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let room_id = parse_id(&room_id, "room")?;
    authorize_roster(&state, room_id, auth.user_id).await?;

    let room = state.rooms.promote_moderator(room_id, body.user_id).await?;
    Ok(Json(room.into()))
}

pub async fn demote_moderator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((room_id, user_id)): Path<(String, String)>,
) -> Result<Json<RoomResponse>, AppError> {
    let room_id = parse_id(&room_id, "room")?;
    let user_id = parse_id(&user_id, "user")?;
    authorize_roster(&state, room_id, auth.user_id).await?;

    let room = state.rooms.demote_moderator(room_id, user_id).await?;
    Ok(Json(room.into()))
}
