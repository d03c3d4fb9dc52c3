//! Saving, listing, loading and deleting reports.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use pv_core::config::InspectionConfig;
use pv_core::error::AppError;
use pv_core::result::AppResult;
use pv_core::traits::storage::DocumentStorage;
use pv_core::types::id::ReportId;
use pv_core::types::pagination::{PageRequest, PageResponse};
use pv_database::store::{ReportFilter, ReportStore, SaveOutcome};
use pv_delivery::render::{DocumentRenderer, RenderedDocument};
use pv_delivery::storage::inspection_document_key;
use pv_entity::inspection::{InspectionBreakdown, InspectionStatus};
use pv_entity::report::{FormData, Report, ReportStats, ReportSummary};

/// Conformity document types accepted for upload, by MIME type.
const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("application/pdf", "pdf"),
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
];

/// A listed report with its inspection status.
#[derive(Debug, Clone, Serialize)]
pub struct ReportListItem {
    #[serde(flatten)]
    pub summary: ReportSummary,
    pub inspection_status: InspectionStatus,
}

/// Report and inspection counters.
#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    #[serde(flatten)]
    pub reports: ReportStats,
    pub inspection: InspectionBreakdown,
}

/// Outcome of a delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedReport {
    pub id: ReportId,
    /// Whether a stored inspection document was removed with it.
    pub document_removed: bool,
}

/// A saved report and its rendered document.
#[derive(Debug, Clone)]
pub struct DownloadedReport {
    pub report: Report,
    pub document: RenderedDocument,
}

/// A stored conformity document.
#[derive(Debug, Clone)]
pub struct InspectionDocument {
    pub key: String,
    pub content_type: String,
    pub content: Bytes,
}

/// Current-state operations on handover reports.
#[derive(Debug, Clone)]
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    renderer: Arc<dyn DocumentRenderer>,
    documents: Arc<dyn DocumentStorage>,
    inspection: InspectionConfig,
    max_document_bytes: u64,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        renderer: Arc<dyn DocumentRenderer>,
        documents: Arc<dyn DocumentStorage>,
        inspection: InspectionConfig,
        max_document_bytes: u64,
    ) -> Self {
        Self {
            store,
            renderer,
            documents,
            inspection,
            max_document_bytes,
        }
    }

    /// Create or overwrite a report. A missing id mints a new one.
    pub async fn save(&self, id: Option<ReportId>, form: FormData) -> AppResult<SaveOutcome> {
        form.validate()?;
        let id = id.unwrap_or_default();
        let outcome = self.store.upsert(id, form, Utc::now()).await?;
        info!(
            report_id = %id,
            created = outcome.created,
            status = %outcome.report.indexed.status,
            "Report saved"
        );
        Ok(outcome)
    }

    /// Reports by last update, most recent first.
    pub async fn list(
        &self,
        filter: &ReportFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ReportListItem>> {
        let today = Utc::now().date_naive();
        let page = self.store.list(filter, page).await?;
        Ok(page.map(|summary| ReportListItem {
            inspection_status: InspectionStatus::evaluate(
                summary.indexed.inspection_date.as_deref(),
                today,
                &self.inspection,
            ),
            summary,
        }))
    }

    pub async fn load(&self, id: ReportId) -> AppResult<Report> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))
    }

    /// Delete a report with its versions, then its stored document.
    pub async fn delete(&self, id: ReportId) -> AppResult<DeletedReport> {
        let removed = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))?;

        let mut document_removed = false;
        if let Some(key) = removed.indexed.inspection_document.as_deref() {
            match self.documents.delete(key).await {
                Ok(()) => document_removed = true,
                Err(e) => warn!(report_id = %id, key, error = %e, "Failed to remove inspection document"),
            }
        }

        info!(report_id = %id, document_removed, "Report deleted");
        Ok(DeletedReport {
            id,
            document_removed,
        })
    }

    /// Save the draft, then render it. A render failure keeps the save.
    pub async fn download(&self, id: Option<ReportId>, form: FormData) -> AppResult<DownloadedReport> {
        let saved = self.save(id, form).await?;
        let document = self.renderer.render(&saved.report.payload).await.map_err(|e| {
            warn!(report_id = %saved.report.id, error = %e, "Rendering failed after save");
            AppError::external(format!("Report saved but rendering failed: {}", e.message))
        })?;
        Ok(DownloadedReport {
            report: saved.report,
            document,
        })
    }

    pub async fn stats(&self) -> AppResult<StatsView> {
        let reports = self.store.stats().await?;
        let dates = self.store.inspection_dates().await?;
        let inspection = InspectionBreakdown::tally(
            dates.iter().map(Option::as_deref),
            Utc::now().date_naive(),
            &self.inspection,
        );
        Ok(StatsView {
            reports,
            inspection,
        })
    }

    /// Store a conformity document and reference it from the report.
    pub async fn upload_inspection_document(
        &self,
        id: ReportId,
        content_type: &str,
        content: Bytes,
    ) -> AppResult<Report> {
        let mime = content_type.split(';').next().unwrap_or_default().trim();
        let extension = DOCUMENT_TYPES
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(mime))
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Unsupported document type '{mime}': expected PDF, PNG or JPEG"
                ))
            })?;
        if content.is_empty() {
            return Err(AppError::validation("Inspection document is empty"));
        }
        if content.len() as u64 > self.max_document_bytes {
            return Err(AppError::validation(format!(
                "Inspection document exceeds {} bytes",
                self.max_document_bytes
            )));
        }

        let current = self.load(id).await?;
        let key = inspection_document_key(id, extension);
        self.documents.write(&key, content).await?;

        let report = self
            .store
            .set_inspection_document(id, Some(key.clone()), Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))?;

        if let Some(previous) = current.indexed.inspection_document.filter(|p| *p != key) {
            if let Err(e) = self.documents.delete(&previous).await {
                warn!(report_id = %id, key = %previous, error = %e, "Failed to remove replaced document");
            }
        }

        info!(report_id = %id, key = %key, "Inspection document stored");
        Ok(report)
    }

    pub async fn inspection_document(&self, id: ReportId) -> AppResult<InspectionDocument> {
        let report = self.load(id).await?;
        let key = report.indexed.inspection_document.ok_or_else(|| {
            AppError::not_found(format!("Report {id} has no inspection document"))
        })?;
        let content = self.documents.read_bytes(&key).await?;
        let content_type = mime_guess::from_path(&key)
            .first_or_octet_stream()
            .to_string();
        Ok(InspectionDocument {
            key,
            content_type,
            content,
        })
    }
}
