//! Report row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use pv_core::types::id::ReportId;

use super::index::{IndexedFields, extract_indexed_fields};
use super::payload::ReportPayload;

/// Current state of a handover report.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    /// Immutable identifier.
    pub id: ReportId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Columns derived from `payload.form_data`.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub indexed: IndexedFields,
    /// When the report was last dispatched.
    pub last_sent_at: Option<DateTime<Utc>>,
    /// Live version number, starting at 1.
    pub current_version: i32,
    /// Authoritative document.
    pub payload: Json<ReportPayload>,
}

impl Report {
    /// Build the row for a payload. Every column is derived from it.
    pub fn from_payload(payload: ReportPayload) -> Self {
        Self {
            id: payload.id,
            created_at: payload.created_at,
            updated_at: payload.updated_at,
            indexed: extract_indexed_fields(&payload.form_data),
            last_sent_at: payload.last_sent_date,
            current_version: payload.version_number(),
            payload: Json(payload),
        }
    }

    /// Whether the indexed columns agree with the payload.
    pub fn is_consistent(&self) -> bool {
        self.indexed == extract_indexed_fields(&self.payload.form_data)
            && self.current_version == self.payload.version_number()
            && self.last_sent_at == self.payload.last_sent_date
    }

    /// Whether the report has been dispatched at least once.
    pub fn is_sent(&self) -> bool {
        self.last_sent_at.is_some()
    }

    /// Listing view without the payload.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            indexed: self.indexed.clone(),
            last_sent_at: self.last_sent_at,
            current_version: self.current_version,
        }
    }
}

/// Report row without its payload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportSummary {
    pub id: ReportId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub indexed: IndexedFields,
    pub last_sent_at: Option<DateTime<Utc>>,
    pub current_version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::form::FormData;
    use crate::report::status::CompletionStatus;

    #[test]
    fn test_from_payload_derives_columns() {
        let now = Utc::now();
        let form = FormData {
            site_name: "Gerland".into(),
            reception_signature: Some("data:image/png;base64,AA".into()),
            ..Default::default()
        };
        let mut payload = ReportPayload::new(ReportId::new(), form, now);

        let draft = Report::from_payload(payload.clone());
        assert_eq!(draft.current_version, 1);
        assert!(!draft.is_sent());
        assert_eq!(draft.indexed.status, CompletionStatus::ReceptionOnly);
        assert!(draft.is_consistent());

        payload.mark_sent(2, now, &["a@x.fr".into()]);
        let sent = Report::from_payload(payload);
        assert_eq!(sent.current_version, 2);
        assert!(sent.is_sent());
        assert!(sent.is_consistent());
    }

    #[test]
    fn test_tampered_columns_are_inconsistent() {
        let form = FormData {
            site_name: "Gerland".into(),
            ..Default::default()
        };
        let mut report = Report::from_payload(ReportPayload::new(ReportId::new(), form, Utc::now()));
        report.indexed.status = CompletionStatus::Complete;
        assert!(!report.is_consistent());
    }
}
