//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, ObjectStorage, Persistence, S3Storage};
use crate::services::{Services, TokenAuthenticator};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!(environment = %config.environment, "Starting server...");

    let db = Database::connect(&config).await?;
    tracing::info!("Database connected");

    let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::new(&config).await);
    tracing::info!(bucket = %config.s3_bucket, "Object storage configured");

    let tokens = Arc::new(TokenAuthenticator::from_config(&config));
    let uow = Arc::new(Persistence::new(db));
    let services = Arc::new(Services::new(uow, tokens.clone(), storage));
    let app_state = AppState::new(services, tokens, &config);

    let app = create_router(app_state);

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
