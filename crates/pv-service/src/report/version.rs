//! Version history of a report.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use pv_core::error::AppError;
use pv_core::result::AppResult;
use pv_core::types::id::ReportId;
use pv_database::store::ReportStore;
use pv_entity::report::{ReportPayload, VersionCreator, VersionEntry};

/// One version of a report with its payload.
#[derive(Debug, Clone, Serialize)]
pub struct VersionView {
    pub report_id: ReportId,
    pub version_number: i32,
    pub current_version: i32,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<VersionCreator>,
    pub comment: Option<String>,
    pub payload: ReportPayload,
}

/// Read access to the version archive.
#[derive(Debug, Clone)]
pub struct VersionService {
    store: Arc<dyn ReportStore>,
}

impl VersionService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// History, highest version first. The live state leads the list.
    pub async fn list_versions(&self, id: ReportId) -> AppResult<Vec<VersionEntry>> {
        let report = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))?;

        let archived = self.store.find_versions(id).await?;
        let mut entries = Vec::with_capacity(archived.len() + 1);
        entries.push(VersionEntry::current(&report));
        entries.extend(archived.iter().map(VersionEntry::from));
        Ok(entries)
    }

    /// Live payload when `number` is the current version, archived
    /// snapshot when it is below, not found otherwise.
    pub async fn load_version(&self, id: ReportId, number: i32) -> AppResult<VersionView> {
        let report = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Report {id} not found")))?;

        if number == report.current_version {
            return Ok(VersionView {
                report_id: id,
                version_number: number,
                current_version: report.current_version,
                is_current: true,
                created_at: report.updated_at,
                created_by: None,
                comment: None,
                payload: report.payload.0,
            });
        }

        let missing = || AppError::not_found(format!("Version {number} of report {id} not found"));
        if !(1..report.current_version).contains(&number) {
            return Err(missing());
        }

        let version = self.store.find_version(id, number).await?.ok_or_else(missing)?;
        Ok(VersionView {
            report_id: id,
            version_number: version.version_number,
            current_version: report.current_version,
            is_current: false,
            created_at: version.created_at,
            created_by: Some(version.created_by),
            comment: version.comment,
            payload: version.payload.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_database::store::{DispatchRecord, MemoryReportStore};
    use pv_entity::report::FormData;

    fn form(site: &str) -> FormData {
        FormData {
            site_name: site.into(),
            ..Default::default()
        }
    }

    async fn report_at_version_three() -> (Arc<MemoryReportStore>, ReportId) {
        let store = Arc::new(MemoryReportStore::new());
        let id = ReportId::new();
        store.upsert(id, form("P1"), Utc::now()).await.unwrap();
        for site in ["P2", "P3"] {
            let record = DispatchRecord {
                sent_at: Utc::now(),
                recipients: vec!["a@x.fr".into()],
                comment: None,
            };
            store.record_dispatch(id, form(site), &record).await.unwrap();
        }
        (store, id)
    }

    #[tokio::test]
    async fn test_list_versions_live_first() {
        let (store, id) = report_at_version_three().await;
        let entries = VersionService::new(store).list_versions(id).await.unwrap();

        let numbers: Vec<(i32, bool)> = entries
            .iter()
            .map(|e| (e.version_number, e.is_current))
            .collect();
        assert_eq!(numbers, vec![(3, true), (2, false), (1, false)]);
        assert_eq!(entries[1].created_by, Some(VersionCreator::EmailSend));
    }

    #[tokio::test]
    async fn test_load_version_ranges() {
        let (store, id) = report_at_version_three().await;
        let service = VersionService::new(store);

        let live = service.load_version(id, 3).await.unwrap();
        assert!(live.is_current);
        assert_eq!(live.payload.site_name, "P3");

        let first = service.load_version(id, 1).await.unwrap();
        assert!(!first.is_current);
        assert_eq!(first.payload.site_name, "P1");

        for out_of_range in [0, 4, -1] {
            assert!(service.load_version(id, out_of_range).await.unwrap_err().is_not_found());
        }
        assert!(service.load_version(ReportId::new(), 1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_new_report_has_single_entry() {
        let store = Arc::new(MemoryReportStore::new());
        let id = ReportId::new();
        store.upsert(id, form("P1"), Utc::now()).await.unwrap();

        let service = VersionService::new(store);
        let entries = service.list_versions(id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_current);
        assert!(service.load_version(id, 1).await.unwrap().is_current);
    }
}
