//! Handover report entities.

pub mod form;
pub mod index;
pub mod model;
pub mod payload;
pub mod stats;
pub mod status;
pub mod version;

pub use form::FormData;
pub use index::{IndexedFields, extract_indexed_fields};
pub use model::{Report, ReportSummary};
pub use payload::{ReportPayload, VersionInfo};
pub use stats::ReportStats;
pub use status::CompletionStatus;
pub use version::{NewReportVersion, ReportVersion, VersionCreator, VersionEntry};
