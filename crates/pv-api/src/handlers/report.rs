//! Report CRUD and download handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use pv_core::types::pagination::PageResponse;
use pv_database::store::ReportFilter;
use pv_entity::inspection::InspectionStatus;
use pv_entity::report::CompletionStatus;
use pv_service::report::{DeletedReport, ReportListItem};

use crate::dto::request::{ListReportsQuery, SaveReportRequest};
use crate::dto::response::{ApiResponse, ReportResponse, SaveResponse};
use crate::error::ApiError;
use crate::extractors::{
    PaginationParams, ValidatedJson, ValidatedPath, ValidatedQuery, parse_report_id,
};
use crate::state::AppState;

/// Header carrying the id of the report saved by a download.
pub const REPORT_ID_HEADER: &str = "x-report-id";

/// GET /api/reports?page&per_page&status&q
pub async fn list_reports(
    State(state): State<AppState>,
    ValidatedQuery(pagination): ValidatedQuery<PaginationParams>,
    ValidatedQuery(query): ValidatedQuery<ListReportsQuery>,
) -> Result<Json<ApiResponse<PageResponse<ReportListItem>>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<CompletionStatus>)
        .transpose()?;
    let filter = ReportFilter {
        status,
        query: query.q,
    };

    let page = state
        .report_service
        .list(&filter, &pagination.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/reports
pub async fn create_report(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SaveReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SaveResponse>>), ApiError> {
    let id = req.report_id()?;
    let outcome = state.report_service.save(id, req.form_data).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(ApiResponse::ok(SaveResponse {
            id: outcome.report.id,
            created: outcome.created,
            report: outcome.report,
        })),
    ))
}

/// GET /api/reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<Json<ApiResponse<ReportResponse>>, ApiError> {
    let report = state.report_service.load(parse_report_id(&id)?).await?;
    let inspection_status = InspectionStatus::evaluate(
        report.indexed.inspection_date.as_deref(),
        Utc::now().date_naive(),
        &state.config.inspection,
    );
    Ok(Json(ApiResponse::ok(ReportResponse {
        report,
        inspection_status,
    })))
}

/// PUT /api/reports/{id}
///
/// The body is `{ id?, form_data }`, where `id` may be omitted but must
/// match the path when given. Creates the report when the id is unknown.
pub async fn update_report(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<String>,
    ValidatedJson(req): ValidatedJson<SaveReportRequest>,
) -> Result<Json<ApiResponse<SaveResponse>>, ApiError> {
    let id = parse_report_id(&id)?;
    if req.report_id()?.is_some_and(|body_id| body_id != id) {
        return Err(pv_core::AppError::validation("Body id does not match the path").into());
    }
    let outcome = state.report_service.save(Some(id), req.form_data).await?;
    Ok(Json(ApiResponse::ok(SaveResponse {
        id,
        created: outcome.created,
        report: outcome.report,
    })))
}

/// DELETE /api/reports/{id}
pub async fn delete_report(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<Json<ApiResponse<DeletedReport>>, ApiError> {
    let deleted = state.report_service.delete(parse_report_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(deleted)))
}

/// POST /api/reports/download
///
/// Saves the draft and returns the rendered document.
pub async fn download_report(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SaveReportRequest>,
) -> Result<Response, ApiError> {
    let id = req.report_id()?;
    let downloaded = state.report_service.download(id, req.form_data).await?;
    let document = downloaded.document;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        document.file_name.replace('"', "")
    );
    let mut response = document.content.into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&document.content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&downloaded.report.id.to_string()) {
        headers.insert(REPORT_ID_HEADER, value);
    }
    Ok(response)
}
