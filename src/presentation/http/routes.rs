//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{auth_middleware, track_metrics};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes())
        .nest("/chatrooms", room_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness))
        .route("/cron", get(handlers::health::cron))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/token/refresh", post(handlers::auth::refresh_token))
}

/// Chat room routes (protected)
fn room_routes(state: AppState) -> Router<AppState> {
    // Base64 inflates JSON attachments, so the body limit sits above the upload limit
    let body_limit = DefaultBodyLimit::max(state.settings.storage.request_body_limit());

    Router::new()
        .route(
            "/",
            get(handlers::room::list_rooms).post(handlers::room::create_room),
        )
        .route(
            "/{id}",
            get(handlers::room::get_room)
                .put(handlers::room::update_room)
                .patch(handlers::room::update_room),
        )
        .route("/{id}/messages", get(handlers::message::list_messages))
        .route(
            "/{id}/messages",
            post(handlers::message::post_message).layer(body_limit),
        )
        .route("/{id}/participants", post(handlers::room::add_participant))
        .route(
            "/{id}/participants/{user_id}",
            delete(handlers::room::remove_participant),
        )
        .route("/{id}/moderators", post(handlers::room::promote_moderator))
        .route(
            "/{id}/moderators/{user_id}",
            delete(handlers::room::demote_moderator),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// User routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/me/profile",
            get(handlers::profile::get_profile).patch(handlers::profile::update_profile),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
