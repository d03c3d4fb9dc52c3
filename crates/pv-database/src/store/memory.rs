//! In-memory report store for single-node runs and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use pv_core::error::AppError;
use pv_core::result::AppResult;
use pv_core::types::id::ReportId;
use pv_core::types::pagination::{PageRequest, PageResponse};
use pv_entity::report::{
    CompletionStatus, FormData, NewReportVersion, Report, ReportPayload, ReportStats,
    ReportSummary, ReportVersion, VersionCreator,
};

use super::{
    DispatchOutcome, DispatchRecord, ReportFilter, ReportStore, SaveOutcome,
    with_inspection_document,
};

#[derive(Debug, Default)]
struct InnerState {
    reports: HashMap<ReportId, Report>,
    /// Archived versions per report keyed by version number.
    versions: HashMap<ReportId, BTreeMap<i32, ReportVersion>>,
    next_version_id: i64,
}

impl InnerState {
    fn archive(&mut self, snapshot: NewReportVersion) -> AppResult<ReportVersion> {
        let archive = self.versions.entry(snapshot.report_id).or_default();
        if archive.contains_key(&snapshot.version_number) {
            return Err(AppError::conflict(format!(
                "Version {} of report {} is already archived",
                snapshot.version_number, snapshot.report_id
            )));
        }
        self.next_version_id += 1;
        let version = snapshot.into_version(self.next_version_id);
        archive.insert(version.version_number, version.clone());
        Ok(version)
    }
}

/// Report store held in a Tokio mutex.
///
/// The lock is held across the whole archive-and-update step of a dispatch.
#[derive(Debug, Clone, Default)]
pub struct MemoryReportStore {
    state: Arc<Mutex<InnerState>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a database error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("Report store rejected the write"));
        }
        Ok(())
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn find_by_id(&self, id: ReportId) -> AppResult<Option<Report>> {
        Ok(self.state.lock().await.reports.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &ReportFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ReportSummary>> {
        let state = self.state.lock().await;
        let mut matching: Vec<&Report> = state
            .reports
            .values()
            .filter(|r| filter.matches(&r.indexed))
            .collect();
        matching.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(Report::summary)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn upsert(
        &self,
        id: ReportId,
        form: FormData,
        now: DateTime<Utc>,
    ) -> AppResult<SaveOutcome> {
        self.check_writable()?;
        let mut state = self.state.lock().await;

        let (payload, created) = match state.reports.get(&id) {
            Some(existing) => (existing.payload.revise(form, now), false),
            None => (ReportPayload::new(id, form, now), true),
        };
        let report = Report::from_payload(payload);
        state.reports.insert(id, report.clone());
        debug!(report_id = %id, created, "Stored report in memory");
        Ok(SaveOutcome { report, created })
    }

    async fn record_dispatch(
        &self,
        id: ReportId,
        form: FormData,
        dispatch: &DispatchRecord,
    ) -> AppResult<DispatchOutcome> {
        self.check_writable()?;
        let mut state = self.state.lock().await;

        let (payload, archived) = match state.reports.get(&id).cloned() {
            Some(current) => {
                let snapshot = NewReportVersion::archive_of(
                    &current,
                    VersionCreator::EmailSend,
                    Some(dispatch.archive_comment(&current)),
                    dispatch.sent_at,
                );
                let archived = state.archive(snapshot)?;
                let mut payload = current.payload.revise(form, dispatch.sent_at);
                payload.mark_sent(current.current_version + 1, dispatch.sent_at, &dispatch.recipients);
                (payload, Some(archived))
            }
            None => {
                let mut payload = ReportPayload::new(id, form, dispatch.sent_at);
                payload.mark_sent(1, dispatch.sent_at, &dispatch.recipients);
                (payload, None)
            }
        };

        let report = Report::from_payload(payload);
        state.reports.insert(id, report.clone());
        Ok(DispatchOutcome { report, archived })
    }

    async fn delete(&self, id: ReportId) -> AppResult<Option<Report>> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let removed = state.reports.remove(&id);
        if removed.is_some() {
            state.versions.remove(&id);
        }
        Ok(removed)
    }

    async fn find_versions(&self, id: ReportId) -> AppResult<Vec<ReportVersion>> {
        let state = self.state.lock().await;
        Ok(state
            .versions
            .get(&id)
            .map(|archive| archive.values().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_version(&self, id: ReportId, number: i32) -> AppResult<Option<ReportVersion>> {
        let state = self.state.lock().await;
        Ok(state
            .versions
            .get(&id)
            .and_then(|archive| archive.get(&number))
            .cloned())
    }

    async fn set_inspection_document(
        &self,
        id: ReportId,
        key: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Report>> {
        self.check_writable()?;
        let mut state = self.state.lock().await;
        let Some(current) = state.reports.get(&id) else {
            return Ok(None);
        };
        let report = with_inspection_document(current, key, now);
        state.reports.insert(id, report.clone());
        Ok(Some(report))
    }

    async fn stats(&self) -> AppResult<ReportStats> {
        let state = self.state.lock().await;
        let mut stats = ReportStats {
            archived_versions: state.versions.values().map(|a| a.len() as i64).sum(),
            ..Default::default()
        };
        for report in state.reports.values() {
            stats.total += 1;
            match report.indexed.status {
                CompletionStatus::Complete => stats.complete += 1,
                CompletionStatus::ReceptionOnly => stats.reception_only += 1,
                CompletionStatus::RetourOnly => stats.retour_only += 1,
                CompletionStatus::Empty => stats.empty += 1,
            }
            if report.indexed.inspection_date.is_some() {
                stats.with_inspection += 1;
            } else {
                stats.without_inspection += 1;
            }
            if report.current_version > 1 {
                stats.multi_version += 1;
            }
        }
        Ok(stats)
    }

    async fn inspection_dates(&self) -> AppResult<Vec<Option<String>>> {
        let state = self.state.lock().await;
        Ok(state
            .reports
            .values()
            .map(|r| r.indexed.inspection_date.clone())
            .collect())
    }
}
