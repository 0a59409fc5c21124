use std::process::ExitCode;

use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vibeverse::{AppState, config::Config, routes};

/// Requests handled at once. Mutations are serialized by the state lock anyway.
const MAX_IN_FLIGHT: usize = 64;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Create application state
    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Could not open storage at {}: {}", config.data_dir.display(), e);
            return ExitCode::FAILURE;
        }
    };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = routes::router(state)
        .layer(GlobalConcurrencyLimitLayer::new(MAX_IN_FLIGHT))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Could not bind {}: {}", config.addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server running on http://{}", config.addr);
    info!("API Endpoints:");
    info!("  GET      /feed?page=N          - Feed page");
    info!("  POST     /posts                - Create post");
    info!("  POST     /posts/:id/like       - Toggle like");
    info!("  POST     /posts/:id/save       - Toggle save");
    info!("  GET/POST /posts/:id/comments   - Comments");
    info!("  GET      /users?q=             - Search users");
    info!("  GET      /users/:id            - Profile");
    info!("  POST     /users/:id/follow     - Toggle follow");
    info!("  GET      /messages             - Conversations");
    info!("  GET/POST /messages/:peer       - Direct messages");
    info!("  GET      /state/export         - Download state");
    info!("  POST     /state/import         - Merge exported state");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
