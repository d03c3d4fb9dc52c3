//! Response DTOs.

use serde::{Deserialize, Serialize};

use pv_core::types::id::ReportId;
use pv_entity::inspection::InspectionStatus;
use pv_entity::report::Report;

/// Standard success wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub store_healthy: bool,
    pub documents_healthy: bool,
    pub mail_configured: bool,
    pub mail_transport: String,
}

/// A report with its evaluated inspection status.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: Report,
    pub inspection_status: InspectionStatus,
}

/// Result of a save.
#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    pub id: ReportId,
    pub created: bool,
    pub report: Report,
}
