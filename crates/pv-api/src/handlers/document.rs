//! Inspection document upload and download.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};

use crate::dto::response::{ApiResponse, SaveResponse};
use crate::error::ApiError;
use crate::extractors::{ValidatedPath, parse_report_id};
use crate::state::AppState;

/// PUT /api/reports/{id}/inspection-document
///
/// Raw body; the `Content-Type` header selects the stored format.
pub async fn upload_inspection_document(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<SaveResponse>>, ApiError> {
    let id = parse_report_id(&id)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let report = state
        .report_service
        .upload_inspection_document(id, content_type, body)
        .await?;
    Ok(Json(ApiResponse::ok(SaveResponse {
        id,
        created: false,
        report,
    })))
}

/// GET /api/reports/{id}/inspection-document
pub async fn get_inspection_document(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<String>,
) -> Result<Response, ApiError> {
    let document = state
        .report_service
        .inspection_document(parse_report_id(&id)?)
        .await?;

    let mut response = document.content.into_response();
    if let Ok(value) = HeaderValue::from_str(&document.content_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    Ok(response)
}
