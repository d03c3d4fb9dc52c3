//! Report dispatch handler.

use axum::Json;
use axum::extract::State;

use pv_service::{DispatchRequest, DispatchResult};

use crate::dto::request::SendReportRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/reports/send
pub async fn send_report(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SendReportRequest>,
) -> Result<Json<ApiResponse<DispatchResult>>, ApiError> {
    let id = req.report_id()?;
    let result = state
        .dispatch_service
        .dispatch(DispatchRequest {
            id,
            form: req.form_data,
            recipients: req.recipients,
            comment: req.comment,
        })
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}
