//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::application::services::{
    AttachmentServiceImpl, AuthService, AuthServiceImpl, MessageService, MessageServiceImpl,
    ProfileService, ProfileServiceImpl, RoomLocks, RoomService, RoomServiceImpl,
};
use crate::config::Settings;
use crate::domain::{
    BlobStore, MessageRepository, ProfileRepository, RoomAccessPolicy, RoomRepository,
    UserRepository,
};
use crate::infrastructure::memory::{
    MemoryMessageRepository, MemoryProfileRepository, MemoryRoomRepository, MemoryUserRepository,
};
use crate::infrastructure::repositories::{
    PgMessageRepository, PgProfileRepository, PgRoomRepository, PgUserRepository,
};
use crate::infrastructure::{database, storage};
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when running on the in-memory backend
    pub db: Option<PgPool>,
    pub auth: Arc<dyn AuthService>,
    pub rooms: Arc<dyn RoomService>,
    pub messages: Arc<dyn MessageService>,
    pub profiles: Arc<dyn ProfileService>,
    pub policy: RoomAccessPolicy,
    pub blob_backend: &'static str,
    pub settings: Arc<Settings>,
}

/// The repository set backing the services
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub messages: Arc<dyn MessageRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            profiles: Arc::new(PgProfileRepository::new(pool.clone())),
            rooms: Arc::new(PgRoomRepository::new(pool.clone())),
            messages: Arc::new(PgMessageRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserRepository::new()),
            profiles: Arc::new(MemoryProfileRepository::new()),
            rooms: Arc::new(MemoryRoomRepository::new()),
            messages: Arc::new(MemoryMessageRepository::new()),
        }
    }
}

impl AppState {
    /// Wire services over the given repositories and blob store
    pub fn new(
        settings: Settings,
        db: Option<PgPool>,
        repos: Repositories,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        let id_generator = Arc::new(SnowflakeGenerator::new(
            settings.snowflake.machine_id as u64,
            0u64,
            settings.snowflake.epoch,
        ));
        let locks = Arc::new(RoomLocks::new());
        let policy = RoomAccessPolicy::new(settings.chat.public_rooms_readable);
        let blob_backend = blob_store.backend();

        let auth = Arc::new(AuthServiceImpl::new(
            repos.users.clone(),
            repos.profiles.clone(),
            id_generator.clone(),
            settings.jwt.clone(),
        ));
        let rooms = Arc::new(RoomServiceImpl::new(
            repos.rooms.clone(),
            repos.users.clone(),
            repos.messages.clone(),
            locks.clone(),
            id_generator.clone(),
        ));
        let attachments = Arc::new(AttachmentServiceImpl::new(blob_store, &settings.storage));
        let messages = Arc::new(MessageServiceImpl::new(
            repos.rooms.clone(),
            repos.messages.clone(),
            attachments,
            locks,
            policy,
            id_generator,
        ));
        let profiles = Arc::new(ProfileServiceImpl::new(repos.profiles));

        Self {
            db,
            auth,
            rooms,
            messages,
            profiles,
            policy,
            blob_backend,
            settings: Arc::new(settings),
        }
    }
}

/// Router with the outer tracing and CORS layers applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(CompressionLayer::new())
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        let (db, repos) = match settings.database.connection_url() {
            Some(url) => {
                let pool = database::create_pool(&settings.database, url)
                    .await
                    .context("failed to connect to PostgreSQL")?;
                tracing::info!("Database connection pool created");

                if settings.database.run_migrations {
                    database::run_migrations(&pool)
                        .await
                        .context("failed to run database migrations")?;
                    tracing::info!("Database migrations applied");
                }

                (Some(pool.clone()), Repositories::postgres(pool))
            }
            None => {
                tracing::warn!("No database configured, using in-memory storage");
                (None, Repositories::in_memory())
            }
        };

        let blob_store = storage::create_blob_store(&settings.storage).await;
        tracing::info!(backend = blob_store.backend(), "Blob store ready");

        let addr = settings.server_addr();
        let state = AppState::new(settings, db, repos, blob_store);
        let router = build_router(state);

        // Bind to address
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
