//! Local filesystem document storage.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use pv_core::error::{AppError, ErrorKind};
use pv_core::result::AppResult;
use pv_core::traits::storage::DocumentStorage;

/// Stores documents under a root directory.
#[derive(Debug, Clone)]
pub struct LocalDocumentStorage {
    root: PathBuf,
}

impl LocalDocumentStorage {
    /// Create the storage, creating the root directory if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key inside the root. Keys with `..` or absolute
    /// components are rejected.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.trim().is_empty() || escapes {
            return Err(AppError::validation(format!("Invalid document key: {key}")));
        }
        Ok(self.root.join(relative))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }

    async fn read_bytes(&self, key: &str) -> AppResult<Bytes> {
        let path = self.resolve(key)?;
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Document not found: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read document: {key}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, key: &str, data: Bytes) -> AppResult<()> {
        let path = self.resolve(key)?;
        self.ensure_parent(&path).await?;
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write document: {key}"),
                e,
            )
        })?;
        debug!(key, bytes = data.len(), "Wrote document");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Deleted document");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete document: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        fs::try_exists(&path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to check document", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> (tempfile::TempDir, LocalDocumentStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalDocumentStorage::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let (_dir, storage) = storage().await;
        storage
            .write("vgp/abc.pdf", Bytes::from_static(b"%PDF-1.4"))
            .await
            .unwrap();
        assert!(storage.exists("vgp/abc.pdf").await.unwrap());
        assert_eq!(
            storage.read_bytes("vgp/abc.pdf").await.unwrap(),
            Bytes::from_static(b"%PDF-1.4")
        );

        storage.delete("vgp/abc.pdf").await.unwrap();
        assert!(!storage.exists("vgp/abc.pdf").await.unwrap());
        storage.delete("vgp/abc.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let (_dir, storage) = storage().await;
        let err = storage.read_bytes("vgp/none.pdf").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let (_dir, storage) = storage().await;
        for key in ["../secret", "vgp/../../etc/passwd", "", "./x"] {
            let err = storage.write(key, Bytes::new()).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "key {key:?}");
        }
    }
}
