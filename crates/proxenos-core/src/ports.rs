//! Capability ports implemented by external backends.
//!
//! The core never touches bytes on disk or a database directly: it talks to
//! a [`FileStorage`] for content and metadata and a [`LockStore`] for lock
//! state. Concrete backends (in-memory, object store, filesystem, database)
//! implement these traits and are injected at construction time.

use crate::types::{FileMetadata, LockRecord, LockToken};
use bytes::Bytes;
use std::future::Future;
use thiserror::Error;

/// Errors surfaced by storage and lock-store backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backend cannot resolve the file id.
    #[error("file '{file_id}' not found")]
    NotFound {
        /// The unresolved file id.
        file_id: String,
    },

    /// Any other backend failure (I/O, network, database).
    #[error("backend failure: {source}")]
    Backend {
        /// The underlying error.
        #[source]
        source: anyhow::Error,
    },
}

impl StorageError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(file_id: impl Into<String>) -> Self {
        Self::NotFound {
            file_id: file_id.into(),
        }
    }

    /// Wraps a backend error.
    pub fn backend(source: impl Into<anyhow::Error>) -> Self {
        Self::Backend {
            source: source.into(),
        }
    }
}

/// Content and metadata access for files.
///
/// `store` replaces the full content and returns the post-write metadata
/// (new version, new size). Backends decide version semantics; the only
/// requirement is that the version changes when the content does.
pub trait FileStorage: Send + Sync + 'static {
    /// Loads the full file content.
    fn load(&self, file_id: &str)
        -> impl Future<Output = Result<Bytes, StorageError>> + Send;

    /// Loads file metadata without the content.
    fn metadata(
        &self,
        file_id: &str,
    ) -> impl Future<Output = Result<FileMetadata, StorageError>> + Send;

    /// Replaces the file content, returning the new metadata.
    fn store(
        &self,
        file_id: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<FileMetadata, StorageError>> + Send;
}

/// Lock state per file id.
///
/// The store holds at most one [`LockRecord`] per file id. Expiry is the
/// store's responsibility: an expired lock must read as absent from both
/// operations, so callers never observe a stale owner.
///
/// `compare_and_swap` is the store's atomicity contract: the caller snapshots
/// state with `get`, decides a transition, and commits it conditioned on the
/// snapshot still holding. Two concurrent LOCK attempts on one file id can
/// therefore never both win. Operations on distinct file ids must not block
/// each other.
pub trait LockStore: Send + Sync + 'static {
    /// Returns the current (unexpired) lock for the file id, if any.
    fn get(
        &self,
        file_id: &str,
    ) -> impl Future<Output = Result<Option<LockRecord>, StorageError>> + Send;

    /// Atomically replaces the lock state for `file_id` if the currently
    /// held token matches `expected` (`None` meaning unlocked). `next` of
    /// `None` releases the lock. Returns `true` when the swap applied,
    /// `false` when the current state no longer matched the expectation.
    fn compare_and_swap(
        &self,
        file_id: &str,
        expected: Option<&LockToken>,
        next: Option<LockRecord>,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = StorageError::not_found("doc-9");
        assert!(err.to_string().contains("doc-9"));
    }

    #[test]
    fn test_backend_error_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::backend(io);
        assert!(err.to_string().contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
