//! # Roomchat
//!
//! Application entry point: tracing, configuration, storage backends and
//! the HTTP server.

use anyhow::Result;
use tracing::info;

use roomchat::config::Settings;
use roomchat::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    roomchat::telemetry::init_tracing();

    info!("Starting Roomchat...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        storage = ?settings.storage.backend,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
