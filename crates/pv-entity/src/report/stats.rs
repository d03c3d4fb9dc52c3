//! Aggregate counters over all reports.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Report counts by completion and versioning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReportStats {
    pub total: i64,
    pub complete: i64,
    pub reception_only: i64,
    pub retour_only: i64,
    pub empty: i64,
    /// Reports carrying a periodic inspection date.
    pub with_inspection: i64,
    pub without_inspection: i64,
    /// Reports whose current version is above 1.
    pub multi_version: i64,
    /// Rows in the version archive.
    pub archived_versions: i64,
}
