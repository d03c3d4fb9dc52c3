//! Authoritative JSON document of a report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pv_core::types::id::ReportId;

use super::form::FormData;

/// Dispatch metadata stamped on a payload when it is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version number the dispatched state became.
    pub number: i32,
    /// When it was sent.
    pub date: DateTime<Utc>,
    /// Comma separated recipients.
    pub sent_to: String,
}

/// The full report document. Indexed columns are derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub id: ReportId,
    #[serde(rename = "chantier", default)]
    pub site_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_sent_date: Option<DateTime<Utc>>,
    pub form_data: FormData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_info: Option<VersionInfo>,
}

impl ReportPayload {
    /// Payload of a report created at `now`.
    ///
    /// The inspection document reference is owned by the store and starts
    /// empty whatever the form carries.
    pub fn new(id: ReportId, mut form_data: FormData, now: DateTime<Utc>) -> Self {
        form_data.inspection_document = None;
        Self {
            id,
            site_name: form_data.site_name().to_string(),
            created_at: now,
            updated_at: now,
            last_sent_date: None,
            form_data,
            version_info: None,
        }
    }

    /// Replace the form contents, keeping identity, dispatch metadata and
    /// the stored inspection document reference.
    pub fn revise(&self, mut form_data: FormData, now: DateTime<Utc>) -> Self {
        form_data.inspection_document = self.form_data.inspection_document.clone();
        Self {
            id: self.id,
            site_name: form_data.site_name().to_string(),
            created_at: self.created_at,
            updated_at: now,
            last_sent_date: self.last_sent_date,
            form_data,
            version_info: self.version_info.clone(),
        }
    }

    /// Same payload pointing at another inspection document, or none.
    pub fn with_inspection_document(&self, key: Option<String>, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.form_data.inspection_document = key;
        next.updated_at = now;
        next
    }

    /// Stamp a dispatch as version `number`.
    pub fn mark_sent(&mut self, number: i32, at: DateTime<Utc>, recipients: &[String]) {
        self.updated_at = at;
        self.last_sent_date = Some(at);
        self.version_info = Some(VersionInfo {
            number,
            date: at,
            sent_to: recipients.join(", "),
        });
    }

    /// Version number recorded in the payload, 1 if never sent.
    pub fn version_number(&self) -> i32 {
        self.version_info.as_ref().map_or(1, |v| v.number)
    }
}
