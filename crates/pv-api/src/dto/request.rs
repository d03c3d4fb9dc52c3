//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use pv_core::error::AppError;
use pv_core::types::id::ReportId;
use pv_entity::report::FormData;

/// Body of a save or download: an optional id and the form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveReportRequest {
    /// Existing report id. Absent to create a new report.
    #[serde(default)]
    pub id: Option<String>,
    pub form_data: FormData,
}

impl SaveReportRequest {
    pub fn report_id(&self) -> Result<Option<ReportId>, AppError> {
        parse_optional_id(self.id.as_deref())
    }
}

/// Body of a dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendReportRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub form_data: FormData,
    /// Overrides the recipients taken from the form.
    #[serde(default)]
    #[validate(length(max = 50, message = "At most 50 recipients"))]
    pub recipients: Option<Vec<String>>,
    /// Comment stored on the archived version.
    #[serde(default)]
    #[validate(length(max = 500, message = "Comment is limited to 500 characters"))]
    pub comment: Option<String>,
}

impl SendReportRequest {
    pub fn report_id(&self) -> Result<Option<ReportId>, AppError> {
        parse_optional_id(self.id.as_deref())
    }
}

/// Query string of the report listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListReportsQuery {
    /// Completion status filter.
    pub status: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
}

fn parse_optional_id(raw: Option<&str>) -> Result<Option<ReportId>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<ReportId>()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid report id: {s}"))),
    }
}
