//! Authentication Handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::application::dto::request::{LoginRequest, RefreshTokenRequest, RegisterRequest};
use crate::application::dto::response::{LoginResponse, RefreshResponse, RegisterResponse};
use crate::presentation::http::extractors::ApiJson;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    state
        .auth
        .register(&body.email, &body.password, &body.confirm_password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Login with credentials
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, tokens) = state.auth.authenticate(&body.email, &body.password).await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse::new(user, tokens.access, tokens.refresh)))
}

/// Exchange a refresh token for a new access token
pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RefreshTokenRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let access = state.auth.refresh(&body.refresh).await?;
    Ok(Json(RefreshResponse { access }))
}
