//! Application builder: wires collaborators, state and router, then
//! serves until a shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;

use pv_core::config::AppConfig;
use pv_core::error::{AppError, ErrorKind};
use pv_database::connection::DatabasePool;
use pv_database::migration::run_migrations;
use pv_database::store::{MemoryReportStore, PgReportStore, ReportStore};
use pv_delivery::{HandoverSheetRenderer, LocalDocumentStorage, mailer_from_config};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application for the given state.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Open the report store selected by `database.backend`.
pub async fn open_store(
    config: &AppConfig,
    auto_migrate: bool,
) -> Result<Arc<dyn ReportStore>, AppError> {
    match config.database.backend.as_str() {
        "memory" => {
            tracing::warn!("Using the in-memory report store; data is lost on restart");
            Ok(Arc::new(MemoryReportStore::new()))
        }
        "postgres" => {
            let db = DatabasePool::connect(&config.database).await?;
            if auto_migrate {
                run_migrations(db.pool()).await?;
            }
            Ok(Arc::new(PgReportStore::new(db.into_pool())))
        }
        other => Err(AppError::configuration(format!(
            "Unknown database backend: {other}"
        ))),
    }
}

/// Runs the report server with the given configuration.
pub async fn run_server(config: AppConfig, auto_migrate: bool) -> Result<(), AppError> {
    tracing::info!("Starting PV server...");

    let store = open_store(&config, auto_migrate).await?;

    let documents = Arc::new(LocalDocumentStorage::new(&config.storage.documents_root).await?);
    let mailer = mailer_from_config(&config.mail)?;
    if !config.mail.is_configured() {
        tracing::warn!("Mail is not configured; dispatch requests will fail");
    }
    tracing::info!(
        store = store.backend(),
        mail_transport = mailer.transport_name(),
        documents_root = %config.storage.documents_root,
        "Collaborators ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(
        config,
        store,
        Arc::new(HandoverSheetRenderer::new()),
        mailer,
        documents,
    );
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}: {e}"), e)
    })?;
    tracing::info!("PV server listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let mut server = std::pin::pin!(server.into_future());
    tokio::select! {
        result = &mut server => {
            return result.map_err(|e| AppError::internal(format!("Server error: {e}")));
        }
        _ = shutdown_rx.changed() => {}
    }

    tracing::info!(grace_seconds = grace.as_secs(), "Draining in-flight requests");
    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.map_err(|e| AppError::internal(format!("Server error: {e}")))?,
        Err(_) => tracing::warn!("Shutdown grace period elapsed; closing remaining connections"),
    }

    tracing::info!("PV server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
