//! Travel Delay Claims - API Server Binary
//!
//! This binary starts the HTTP API server for the claim decision engine.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claims-api
//!
//! # Run against the in-memory store
//! API_STORAGE=memory API_PORT=8080 cargo run --bin claims-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_STORAGE` - `postgres` or `memory` (default: postgres)
//! * `API_TIMEZONE` - IANA timezone for "today's claims" (default: Asia/Shanghai)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_claims::{ClaimRepository, ClaimService, DecisionEngine, InMemoryClaimRepository};
use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimAdapter};
use interface_api::{
    config::{ApiConfig, StorageBackend},
    create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("loading API configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        timezone = %config.timezone,
        "Starting travel delay claims API server"
    );

    let timezone = config.timezone().context("parsing API_TIMEZONE")?;
    let repository = build_repository(&config).await?;
    let service = Arc::new(ClaimService::new(repository, DecisionEngine::default(), timezone));

    let app = create_router(service, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Builds the claim repository selected by `API_STORAGE`.
///
/// The Postgres backend connects and applies migrations before serving.
async fn build_repository(config: &ApiConfig) -> anyhow::Result<Arc<dyn ClaimRepository>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory claim storage; claims are lost on restart");
            Ok(Arc::new(InMemoryClaimRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = create_pool(DatabaseConfig::new(&config.database_url))
                .await
                .context("connecting to database")?;
            run_migrations(&pool).await.context("applying migrations")?;
            Ok(Arc::new(PostgresClaimAdapter::new(pool)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
