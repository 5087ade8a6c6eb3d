//! In-memory file storage backend.
//!
//! Reference implementation of the storage port for single-process
//! deployments and tests. Versions are monotonic per-file counters that
//! advance on every content write.

use bytes::Bytes;
use dashmap::DashMap;
use proxenos_core::{FileMetadata, FileStorage, StorageError};

#[derive(Debug, Clone)]
struct StoredFile {
    content: Bytes,
    version: u64,
}

/// File storage holding content in process memory.
#[derive(Debug, Default)]
pub struct InMemoryFileStorage {
    files: DashMap<String, StoredFile>,
}

impl InMemoryFileStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file at version 1, replacing any existing content.
    pub fn insert(&self, file_id: impl Into<String>, content: impl Into<Bytes>) {
        self.files.insert(
            file_id.into(),
            StoredFile {
                content: content.into(),
                version: 1,
            },
        );
    }

    /// Number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` when no files are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileStorage for InMemoryFileStorage {
    async fn load(&self, file_id: &str) -> Result<Bytes, StorageError> {
        self.files
            .get(file_id)
            .map(|file| file.content.clone())
            .ok_or_else(|| StorageError::not_found(file_id))
    }

    async fn metadata(&self, file_id: &str) -> Result<FileMetadata, StorageError> {
        self.files
            .get(file_id)
            .map(|file| FileMetadata::new(file.version.to_string(), file.content.len() as u64))
            .ok_or_else(|| StorageError::not_found(file_id))
    }

    async fn store(&self, file_id: &str, content: Bytes) -> Result<FileMetadata, StorageError> {
        let mut entry = self
            .files
            .entry(file_id.to_string())
            .or_insert_with(|| StoredFile {
                content: Bytes::new(),
                version: 0,
            });
        entry.version += 1;
        entry.content = content;

        Ok(FileMetadata::new(
            entry.version.to_string(),
            entry.content.len() as u64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let storage = InMemoryFileStorage::new();
        let result = storage.load("doc-1").await;
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_seed_then_load() {
        let storage = InMemoryFileStorage::new();
        storage.insert("doc-1", &b"hello"[..]);

        let content = storage.load("doc-1").await.unwrap();
        assert_eq!(content.as_ref(), b"hello");

        let metadata = storage.metadata("doc-1").await.unwrap();
        assert_eq!(metadata.version, "1");
        assert_eq!(metadata.size_bytes, 5);
    }

    #[tokio::test]
    async fn test_store_bumps_version() {
        let storage = InMemoryFileStorage::new();
        storage.insert("doc-1", &b"v1"[..]);

        let metadata = storage.store("doc-1", Bytes::from_static(b"v2!")).await.unwrap();
        assert_eq!(metadata.version, "2");
        assert_eq!(metadata.size_bytes, 3);

        let content = storage.load("doc-1").await.unwrap();
        assert_eq!(content.as_ref(), b"v2!");
    }

    #[tokio::test]
    async fn test_store_creates_missing_file() {
        let storage = InMemoryFileStorage::new();

        let metadata = storage
            .store("doc-new", Bytes::from_static(b"fresh"))
            .await
            .unwrap();
        assert_eq!(metadata.version, "1");
        assert_eq!(storage.load("doc-new").await.unwrap().as_ref(), b"fresh");
    }
}
