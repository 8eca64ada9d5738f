//! Message Handlers
//!
//! Messages are posted either as `multipart/form-data` (`content`, `type`,
//! `file`) or as JSON with the attachment base64-encoded in `file_data`.

use axum::{
    extract::{Extension, FromRequest, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::application::dto::request::{MessageQuery, PostMessageRequest};
use crate::application::dto::response::MessageResponse;
use crate::application::services::{AttachmentUpload, NewMessage};
use crate::domain::{MessagePage, MessageType};
use crate::presentation::http::extractors::ApiJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::parse_id;
use crate::startup::AppState;

use super::room::viewable_room;

/// Filename used when the client sends bytes without one
const DEFAULT_FILE_NAME: &str = "upload";

/// List messages of a room, oldest first
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let room_id = parse_id(&room_id, "room")?;
    viewable_room(&state, room_id, auth.user_id).await?;

    let after = match query.after.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_id(raw, "message")?),
        _ => None,
    };
    let page = MessagePage {
        after,
        limit: query.limit,
    };

    let messages = state.messages.list_messages(room_id, page).await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Post a message, optionally with an attachment
pub async fn post_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
    request: Request,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let room_id = parse_id(&room_id, "room")?;

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let message = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        read_multipart(multipart).await?
    } else {
        let ApiJson(body) = ApiJson::<PostMessageRequest>::from_request(request, &state).await?;
        read_json(body)?
    };

    let message = state
        .messages
        .append_message(room_id, auth.user_id, message)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

fn parse_type(raw: Option<&str>) -> Result<Option<MessageType>, AppError> {
    match raw.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(None),
        Some(t) => MessageType::parse(t)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid message type: {}", t))),
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<NewMessage, AppError> {
    let mut content = None;
    let mut message_type = None;
    let mut attachment = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "content" => {
                content = Some(field.text().await.map_err(|e| AppError::BadRequest(e.body_text()))?);
            }
            "type" => {
                let raw = field.text().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
                message_type = parse_type(Some(&raw))?;
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(DEFAULT_FILE_NAME)
                    .to_string();
                let declared_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| AppError::BadRequest(e.body_text()))?;

                attachment = Some(AttachmentUpload {
                    bytes: bytes.to_vec(),
                    file_name,
                    declared_type,
                });
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(NewMessage {
        content,
        message_type,
        attachment,
    })
}

fn read_json(body: PostMessageRequest) -> Result<NewMessage, AppError> {
    let message_type = parse_type(body.message_type.as_deref())?;

    let attachment = match body.file_data.as_deref().map(str::trim) {
        Some(data) if !data.is_empty() => {
            let bytes = STANDARD
                .decode(data)
                .map_err(|_| AppError::Validation("file_data must be valid base64".into()))?;
            Some(AttachmentUpload {
                bytes,
                file_name: body
                    .file_name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
                declared_type: body.file_type,
            })
        }
        _ => None,
    };

    Ok(NewMessage {
        content: body.content,
        message_type,
        attachment,
    })
}
