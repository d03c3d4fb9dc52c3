//! Inspection-document storage configuration.

use serde::{Deserialize, Serialize};

/// Storage settings for periodic-inspection conformity documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored documents.
    #[serde(default = "default_documents_root")]
    pub documents_root: String,
    /// Maximum accepted document size in bytes (default 10 MB).
    #[serde(default = "default_max_document")]
    pub max_document_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            documents_root: default_documents_root(),
            max_document_bytes: default_max_document(),
        }
    }
}

fn default_documents_root() -> String {
    "./data/documents".to_string()
}

fn default_max_document() -> u64 {
    10_485_760 // 10 MB
}
