//! Archived report versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use std::fmt;

use pv_core::types::id::ReportId;

use super::model::Report;
use super::payload::ReportPayload;

/// What produced an archived version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "version_creator", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VersionCreator {
    System,
    EmailSend,
}

impl VersionCreator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::EmailSend => "email_send",
        }
    }
}

impl fmt::Display for VersionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable snapshot of a report payload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportVersion {
    /// Storage-assigned row identifier.
    pub id: i64,
    /// The report this snapshot belongs to.
    pub report_id: ReportId,
    /// Version number the snapshot represented while live.
    pub version_number: i32,
    /// When the snapshot was archived.
    pub created_at: DateTime<Utc>,
    /// The archived payload.
    pub payload: Json<ReportPayload>,
    /// What produced the snapshot.
    pub created_by: VersionCreator,
    /// Optional comment.
    pub comment: Option<String>,
}

/// A snapshot waiting to be inserted.
#[derive(Debug, Clone)]
pub struct NewReportVersion {
    pub report_id: ReportId,
    pub version_number: i32,
    pub created_at: DateTime<Utc>,
    pub payload: ReportPayload,
    pub created_by: VersionCreator,
    pub comment: Option<String>,
}

impl NewReportVersion {
    /// Snapshot the live state of `report` under its current number.
    pub fn archive_of(
        report: &Report,
        created_by: VersionCreator,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            report_id: report.id,
            version_number: report.current_version,
            created_at: at,
            payload: report.payload.0.clone(),
            created_by,
            comment,
        }
    }

    /// Attach the storage-assigned identifier.
    pub fn into_version(self, id: i64) -> ReportVersion {
        ReportVersion {
            id,
            report_id: self.report_id,
            version_number: self.version_number,
            created_at: self.created_at,
            payload: Json(self.payload),
            created_by: self.created_by,
            comment: self.comment,
        }
    }
}

/// One line of a report's version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version_number: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<VersionCreator>,
    pub comment: Option<String>,
    /// Set only on the live state.
    pub is_current: bool,
}

impl VersionEntry {
    /// Entry describing the live state of a report.
    pub fn current(report: &Report) -> Self {
        Self {
            version_number: report.current_version,
            created_at: report.updated_at,
            created_by: None,
            comment: None,
            is_current: true,
        }
    }
}

impl From<&ReportVersion> for VersionEntry {
    fn from(version: &ReportVersion) -> Self {
        Self {
            version_number: version.version_number,
            created_at: version.created_at,
            created_by: Some(version.created_by),
            comment: version.comment.clone(),
            is_current: false,
        }
    }
}
