//! Version history handlers.

use axum::Json;
use axum::extract::State;

use pv_entity::report::VersionEntry;
use pv_service::report::VersionView;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{ValidatedPath, parse_report_id, parse_version_number};
use crate::state::AppState;

/// GET /api/reports/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<Json<ApiResponse<Vec<VersionEntry>>>, ApiError> {
    let entries = state
        .version_service
        .list_versions(parse_report_id(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// GET /api/reports/{id}/versions/{n}
pub async fn get_version(
    State(state): State<AppState>,
    ValidatedPath((id, number)): ValidatedPath<(String, String)>,
) -> Result<Json<ApiResponse<VersionView>>, ApiError> {
    let view = state
        .version_service
        .load_version(parse_report_id(&id)?, parse_version_number(&number)?)
        .await?;
    Ok(Json(ApiResponse::ok(view)))
}
