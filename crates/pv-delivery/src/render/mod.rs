//! Document rendering.

pub mod sheet;

use async_trait::async_trait;
use bytes::Bytes;

use pv_core::result::AppResult;
use pv_entity::report::ReportPayload;

pub use sheet::HandoverSheetRenderer;

/// A rendered report document.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub content_type: String,
    pub content: Bytes,
}

/// Renders a report payload into a document.
#[async_trait]
pub trait DocumentRenderer: Send + Sync + std::fmt::Debug + 'static {
    /// Renderer name for logs.
    fn name(&self) -> &str;

    async fn render(&self, payload: &ReportPayload) -> AppResult<RenderedDocument>;
}

/// Attachment file name for a report: `PV_Materiel_<site>_<date>.<ext>`.
pub fn document_file_name(payload: &ReportPayload, extension: &str) -> String {
    let site: String = payload
        .site_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let date = payload
        .form_data
        .reception_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("sans_date");
    format!("PV_Materiel_{site}_{date}.{extension}")
}
