use std::sync::Arc;

use tokio::{net::TcpListener, signal};
use tracing_subscriber::EnvFilter;

use singmeasong_api::{
    api::{create_router, AppState},
    config::{Config, StorageBackend},
    db::{self, InMemoryRecommendationRepository, PgRecommendationRepository},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;

    // Initialize application state
    let state = match config.storage {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database_url, config.database_max_connections)
                .await?;
            if config.run_migrations {
                db::run_migrations(&pool).await?;
            }
            AppState::new(Arc::new(PgRecommendationRepository::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, recommendations are lost on restart");
            AppState::new(Arc::new(InMemoryRecommendationRepository::new()))
        }
    };
    tracing::info!(backend = state.repository.name(), "Storage ready");

    // Create the router with all routes
    let app = create_router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
