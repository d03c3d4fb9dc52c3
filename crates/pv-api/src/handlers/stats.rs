//! Statistics handler.

use axum::Json;
use axum::extract::State;

use pv_service::report::StatsView;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/stats
pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatsView>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.report_service.stats().await?)))
}
