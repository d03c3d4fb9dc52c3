//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let store_healthy = state.store.health_check().await.unwrap_or(false);
    let documents_healthy = state.documents.health_check().await.unwrap_or(false);
    let status = if store_healthy && documents_healthy {
        "ok"
    } else {
        "degraded"
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.backend().to_string(),
        store_healthy,
        documents_healthy,
        mail_configured: state.dispatch_service.mail_configured(),
        mail_transport: state.mail_transport.clone(),
    }))
}
