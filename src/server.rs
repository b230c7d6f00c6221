//! HTTP server initialization and runtime setup.
//!
//! Handles store setup, click worker spawning, and Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::domain::click_worker::{click_channel, run_click_worker};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::persistence::{
    InMemoryUrlRepository, SqliteUrlRepository, connect_pool, run_migrations,
};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Record store (SQLite with migrations, or in-memory)
/// - Background click worker
/// - Axum HTTP server
///
/// Returns after a shutdown signal once in-flight requests finished and the
/// click worker drained its queue.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = open_store(&config).await?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    serve(listener, repository, &config, shutdown_signal()).await
}

/// Serves on an already bound listener until `shutdown` resolves.
///
/// Used by [`run`] and by tests that bind an ephemeral port.
pub async fn serve<F>(
    listener: TcpListener,
    repository: Arc<dyn UrlRepository>,
    config: &Config,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (click_sender, click_rx) = click_channel(config.click_queue_capacity);

    let worker = tokio::spawn(run_click_worker(
        click_rx,
        Arc::clone(&repository),
        config.click_worker_concurrency,
    ));
    tracing::info!("Click worker started");

    let state = AppState::new(
        repository,
        click_sender,
        CodeGenerator::new(config.code_length),
        config.max_generation_attempts,
        config.base_url.clone(),
    );

    let app = app_router(state);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown)
        .await?;

    // The router and every state clone are gone, so the click channel closes
    // and the worker finishes what is queued.
    if let Err(e) = worker.await {
        tracing::error!("Click worker terminated abnormally: {}", e);
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the configured record store.
///
/// # Errors
///
/// Returns an error if the SQLite pool cannot be opened or migrated.
pub async fn open_store(config: &Config) -> Result<Arc<dyn UrlRepository>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store, records are lost on restart");
            Ok(Arc::new(InMemoryUrlRepository::new()))
        }
        StorageBackend::Sqlite => {
            let pool = connect_pool(
                &config.database_url,
                config.db_max_connections,
                Duration::from_secs(config.db_connect_timeout),
            )
            .await
            .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;

            Ok(Arc::new(SqliteUrlRepository::new(Arc::new(pool))))
        }
    }
}

/// Resolves on Ctrl-C, or on SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
