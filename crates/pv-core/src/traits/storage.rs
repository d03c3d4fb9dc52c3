//! Storage trait for periodic-inspection conformity documents.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for document storage backends.
///
/// Keys are relative, slash-separated paths; implementations must refuse
/// keys that escape their root.
#[async_trait]
pub trait DocumentStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g. `"local"`).
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read a document into memory.
    async fn read_bytes(&self, key: &str) -> AppResult<Bytes>;

    /// Write a document, replacing any existing content.
    async fn write(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Delete a document. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a document exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
