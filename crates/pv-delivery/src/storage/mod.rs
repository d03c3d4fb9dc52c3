//! Inspection document storage.

pub mod local;

pub use local::LocalDocumentStorage;

use pv_core::types::id::ReportId;

/// Storage key of the conformity document of a report.
pub fn inspection_document_key(id: ReportId, extension: &str) -> String {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    format!("vgp/{id}.{extension}")
}
