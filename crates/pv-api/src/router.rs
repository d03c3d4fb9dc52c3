//! Route definitions for the report HTTP API.
//!
//! All routes are mounted under `/api` and receive `AppState` through
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(report_routes())
        .merge(version_routes())
        .merge(document_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/stats", get(handlers::stats::get_stats))
}

/// Report CRUD, download and dispatch
fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reports",
            get(handlers::report::list_reports).post(handlers::report::create_report),
        )
        .route("/reports/download", post(handlers::report::download_report))
        .route("/reports/send", post(handlers::dispatch::send_report))
        .route(
            "/reports/{id}",
            get(handlers::report::get_report)
                .put(handlers::report::update_report)
                .delete(handlers::report::delete_report),
        )
}

fn version_routes() -> Router<AppState> {
    Router::new()
        .route("/reports/{id}/versions", get(handlers::version::list_versions))
        .route(
            "/reports/{id}/versions/{number}",
            get(handlers::version::get_version),
        )
}

fn document_routes() -> Router<AppState> {
    Router::new().route(
        "/reports/{id}/inspection-document",
        put(handlers::document::upload_inspection_document)
            .get(handlers::document::get_inspection_document),
    )
}
