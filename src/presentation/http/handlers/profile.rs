//! Profile Handlers

use axum::{
    extract::{Extension, State},
    Json,
};
use validator::Validate;

use crate::application::dto::request::UpdateProfileRequest;
use crate::application::dto::response::ProfileResponse;
use crate::application::services::ProfileUpdate;
use crate::presentation::http::extractors::ApiJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Get the caller's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.profiles.get_profile(auth.user_id).await?;
    Ok(Json(profile.into()))
}

/// Update the caller's profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    body.validate().map_err(validation_error)?;

    let update = ProfileUpdate {
        bio: body.bio,
        avatar_url: body.avatar_url,
    };
    let profile = state.profiles.update_profile(auth.user_id, update).await?;

    Ok(Json(profile.into()))
}
