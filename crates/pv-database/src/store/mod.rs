//! Report store: current-state records and their version archive.
//!
//! Every write takes form data and rebuilds the row with
//! [`Report::from_payload`], so indexed columns cannot drift from the
//! payload. A dispatch archives the live payload and overwrites it in a
//! single unit of work.

pub mod memory;
pub mod postgres;

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pv_core::result::AppResult;
use pv_core::types::id::ReportId;
use pv_core::types::pagination::{PageRequest, PageResponse};
use pv_entity::report::{
    CompletionStatus, FormData, IndexedFields, Report, ReportStats, ReportSummary, ReportVersion,
};

pub use memory::MemoryReportStore;
pub use postgres::PgReportStore;

/// Listing filters.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Only reports with this completion status.
    pub status: Option<CompletionStatus>,
    /// Case-insensitive search over site, equipment, supplier and responsible.
    pub query: Option<String>,
}

impl ReportFilter {
    /// Trimmed, non-empty search text.
    pub fn search_text(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Search text as an `ILIKE ... ESCAPE '\'` pattern matching it literally.
    pub fn like_pattern(&self) -> Option<String> {
        self.search_text().map(|q| {
            let mut pattern = String::with_capacity(q.len() + 2);
            pattern.push('%');
            for c in q.chars() {
                if matches!(c, '\\' | '%' | '_') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }

    /// Whether an indexed row passes the filter.
    pub fn matches(&self, fields: &IndexedFields) -> bool {
        if self.status.is_some_and(|s| s != fields.status) {
            return false;
        }
        let Some(needle) = self.search_text() else {
            return true;
        };
        let needle = needle.to_lowercase();
        std::iter::once(Some(fields.site_name.as_str()))
            .chain([
                fields.equipment_type.as_deref(),
                fields.supplier.as_deref(),
                fields.responsible.as_deref(),
            ])
            .flatten()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// A delivered dispatch to record against a report.
#[derive(Debug, Clone)]
pub struct DispatchRecord {
    pub sent_at: DateTime<Utc>,
    pub recipients: Vec<String>,
    /// Comment stored on the archived version instead of the default.
    pub comment: Option<String>,
}

impl DispatchRecord {
    /// Comment for the snapshot of `previous` archived by this dispatch.
    pub fn archive_comment(&self, previous: &Report) -> String {
        if let Some(comment) = self.comment.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            return comment.to_string();
        }
        match &previous.payload.version_info {
            Some(info) => format!("Sent to {}", info.sent_to),
            None => format!("Draft superseded by dispatch to {}", self.recipients.join(", ")),
        }
    }
}

/// Result of a plain save.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub report: Report,
    /// `true` when no report existed under the id.
    pub created: bool,
}

/// Result of recording a dispatch.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub report: Report,
    /// Snapshot of the superseded state, absent on first creation.
    pub archived: Option<ReportVersion>,
}

/// Persistence of reports and their version archive.
#[async_trait]
pub trait ReportStore: Send + Sync + Debug + 'static {
    /// Backend name for health output.
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> AppResult<bool>;

    async fn find_by_id(&self, id: ReportId) -> AppResult<Option<Report>>;

    /// Summaries ordered by last update, most recent first.
    async fn list(
        &self,
        filter: &ReportFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ReportSummary>>;

    /// Create or overwrite a report in place. Never archives a version.
    async fn upsert(&self, id: ReportId, form: FormData, now: DateTime<Utc>)
    -> AppResult<SaveOutcome>;

    /// Archive the live state (if any) and store `form` as the next
    /// version, all or nothing.
    async fn record_dispatch(
        &self,
        id: ReportId,
        form: FormData,
        dispatch: &DispatchRecord,
    ) -> AppResult<DispatchOutcome>;

    /// Remove a report and its versions, returning the removed row.
    async fn delete(&self, id: ReportId) -> AppResult<Option<Report>>;

    /// Archived versions, highest number first.
    async fn find_versions(&self, id: ReportId) -> AppResult<Vec<ReportVersion>>;

    async fn find_version(&self, id: ReportId, number: i32) -> AppResult<Option<ReportVersion>>;

    /// Set or clear the inspection document reference in the payload.
    async fn set_inspection_document(
        &self,
        id: ReportId,
        key: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Report>>;

    async fn stats(&self) -> AppResult<ReportStats>;

    /// Inspection date of every report.
    async fn inspection_dates(&self) -> AppResult<Vec<Option<String>>>;
}

/// Payload of a report after the inspection document reference changed.
pub(crate) fn with_inspection_document(
    current: &Report,
    key: Option<String>,
    now: DateTime<Utc>,
) -> Report {
    Report::from_payload(current.payload.with_inspection_document(key, now))
}
