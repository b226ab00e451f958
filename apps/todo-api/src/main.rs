use axum_helpers::server::{Server, ShutdownCoordinator};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

use todo_api::config::Config;
use todo_api::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.url());

    // Single attempt; an unreachable server aborts startup
    let mongo_client = database::mongodb::connect_from_config(&config.mongodb).await?;

    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    let app = todo_api::build_router(&state);

    let server = Server::bind(&state.config.server).await?;
    let coordinator = ShutdownCoordinator::new();

    let signals = coordinator.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    info!(
        "Starting Todo API (shutdown grace {:?})",
        state.config.server.shutdown_grace
    );

    server
        .run(app, coordinator)
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shutting down: closing MongoDB connections");
    // MongoDB client closes automatically on drop
    drop(state);

    info!("Todo API shutdown complete");
    Ok(())
}
