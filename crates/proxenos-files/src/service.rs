//! The file access service.
//!
//! Orchestrates the storage port and the lock protocol engine to answer
//! CheckFileInfo, GetFile, and PutFile. The engine decides transitions over
//! a snapshot of the lock store; this service makes the read-decide-write
//! sequence atomic per file id by committing each decision with a
//! compare-and-swap and re-reading when the snapshot lost a race.

use crate::info::FileInfo;
use bytes::Bytes;
use chrono::Utc;
use http::StatusCode;
use proxenos_config::CapabilityConfig;
use proxenos_core::{
    FileMetadata, FileStorage, LockStore, LockToken, StorageError, UserContext, WopiError,
    WopiResult,
};
use proxenos_lock::{LockChange, LockEngine, WopiOverride};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Outcome of a PutFile-style override request.
///
/// Carries everything the HTTP layer needs: the status, the
/// `X-WOPI-Lock` response header value when the protocol requires one, and
/// the post-write item version for successful content writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOutcome {
    /// Response status code.
    pub status: StatusCode,
    /// `X-WOPI-Lock` response header value, when required.
    pub lock_header: Option<LockToken>,
    /// New file version after a successful content write.
    pub item_version: Option<String>,
}

impl PutOutcome {
    /// Whether the outcome is a lock conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status == StatusCode::CONFLICT
    }
}

/// Answers WOPI file requests over injected storage and lock backends.
#[derive(Debug)]
pub struct FileAccessService<S, L> {
    storage: Arc<S>,
    locks: Arc<L>,
    engine: LockEngine,
    capabilities: CapabilityConfig,
}

impl<S: FileStorage, L: LockStore> FileAccessService<S, L> {
    /// Creates the service over the injected backends.
    #[must_use]
    pub fn new(storage: Arc<S>, locks: Arc<L>, capabilities: CapabilityConfig) -> Self {
        Self {
            storage,
            locks,
            engine: LockEngine::new(),
            capabilities,
        }
    }

    /// The storage backend.
    #[must_use]
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Answers CheckFileInfo: fixed capability flags plus per-file size,
    /// version, and the caller's identity.
    ///
    /// # Errors
    ///
    /// [`WopiError::FileNotFound`] when the storage port cannot resolve the
    /// id; [`WopiError::Cancelled`] when `cancel` fires first.
    pub async fn check_file_info(
        &self,
        file_id: &str,
        user: &UserContext,
        cancel: &CancellationToken,
    ) -> WopiResult<FileInfo> {
        let metadata = bounded(cancel, self.storage.metadata(file_id)).await?;
        debug!(file_id, user_id = %user.user_id, "check file info");
        Ok(FileInfo::new(&self.capabilities, user, metadata))
    }

    /// Loads content and metadata for GetFile.
    ///
    /// The returned metadata's size always equals the content length; a
    /// backend that disagrees is surfaced as an internal error rather than
    /// letting a wrong `Content-Length` reach the wire.
    pub async fn get_file(
        &self,
        file_id: &str,
        cancel: &CancellationToken,
    ) -> WopiResult<(Bytes, FileMetadata)> {
        let content = bounded(cancel, self.storage.load(file_id)).await?;
        let metadata = bounded(cancel, self.storage.metadata(file_id)).await?;

        if metadata.size_bytes != content.len() as u64 {
            return Err(WopiError::internal(format!(
                "storage reported size {} for '{file_id}' but returned {} bytes",
                metadata.size_bytes,
                content.len()
            )));
        }

        Ok((content, metadata))
    }

    /// Runs a lock-protocol override against the file, writing `body` when
    /// the transition authorizes a content write.
    ///
    /// Lock conflicts are returned as a 409 [`PutOutcome`], not an error.
    ///
    /// # Errors
    ///
    /// [`WopiError::PersistedLockButWriteFailed`] when the content write
    /// fails while the caller's lock is committed in the store; the caller
    /// may retry the PUT without re-acquiring the lock. Plain
    /// [`WopiError::Storage`] for write failures with no lock held.
    pub async fn put_file(
        &self,
        file_id: &str,
        instruction: WopiOverride,
        caller: &LockToken,
        body: Bytes,
        cancel: &CancellationToken,
    ) -> WopiResult<PutOutcome> {
        loop {
            if cancel.is_cancelled() {
                return Err(WopiError::Cancelled);
            }

            let current = bounded(cancel, self.locks.get(file_id)).await?;
            let transition = self.engine.evaluate(
                instruction,
                file_id,
                current.as_ref(),
                caller,
                Utc::now(),
            );
            let expected = current.as_ref().map(|record| &record.token);

            let committed = match &transition.change {
                LockChange::Keep => true,
                LockChange::Acquire(record) | LockChange::Refresh(record) => {
                    bounded(
                        cancel,
                        self.locks
                            .compare_and_swap(file_id, expected, Some(record.clone())),
                    )
                    .await?
                }
                LockChange::Release => {
                    bounded(cancel, self.locks.compare_and_swap(file_id, expected, None)).await?
                }
            };

            if !committed {
                // Another session won the read-decide-write race for this
                // file id; re-read and re-decide.
                debug!(file_id, instruction = %instruction, "lock state changed underneath, retrying");
                continue;
            }

            debug!(
                file_id,
                instruction = %instruction,
                status = transition.outcome.status.as_u16(),
                "lock transition committed"
            );

            if !transition.write_content {
                return Ok(PutOutcome {
                    status: transition.outcome.status,
                    lock_header: transition.outcome.lock_header,
                    item_version: None,
                });
            }

            let lock_held = current.is_some();
            return match bounded(cancel, self.storage.store(file_id, body)).await {
                Ok(metadata) => Ok(PutOutcome {
                    status: transition.outcome.status,
                    lock_header: transition.outcome.lock_header,
                    item_version: Some(metadata.version),
                }),
                Err(error @ (WopiError::Cancelled | WopiError::FileNotFound { .. })) => Err(error),
                Err(error) if lock_held => {
                    warn!(file_id, error = %error, "content write failed under a committed lock");
                    Err(WopiError::PersistedLockButWriteFailed {
                        file_id: file_id.to_string(),
                        source: error.into(),
                    })
                }
                Err(error) => Err(error),
            };
        }
    }
}

/// Races a port future against the caller's cancellation signal and maps
/// backend errors into the unified taxonomy.
async fn bounded<T>(
    cancel: &CancellationToken,
    operation: impl Future<Output = Result<T, StorageError>>,
) -> WopiResult<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(WopiError::Cancelled),
        result = operation => result.map_err(map_storage_error),
    }
}

fn map_storage_error(error: StorageError) -> WopiError {
    match error {
        StorageError::NotFound { file_id } => WopiError::FileNotFound { file_id },
        StorageError::Backend { source } => WopiError::Storage {
            message: "backend operation failed".to_string(),
            source: Some(source),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryFileStorage;
    use proxenos_lock::InMemoryLockStore;
    use std::time::Duration;

    fn service() -> FileAccessService<InMemoryFileStorage, InMemoryLockStore> {
        let storage = Arc::new(InMemoryFileStorage::new());
        storage.insert("doc-1", &b"spreadsheet bytes"[..]);
        FileAccessService::new(
            storage,
            Arc::new(InMemoryLockStore::new(Duration::from_secs(1800))),
            CapabilityConfig::default(),
        )
    }

    fn user() -> UserContext {
        UserContext::new("user-1", "Ada", false)
    }

    #[tokio::test]
    async fn test_check_file_info() {
        let service = service();
        let cancel = CancellationToken::new();

        let info = service
            .check_file_info("doc-1", &user(), &cancel)
            .await
            .unwrap();
        assert_eq!(info.size, 17);
        assert_eq!(info.version, "1");
        assert_eq!(info.user_id, "user-1");
        assert!(info.supports_locks);
    }

    #[tokio::test]
    async fn test_check_file_info_missing_file() {
        let service = service();
        let cancel = CancellationToken::new();

        let result = service.check_file_info("ghost", &user(), &cancel).await;
        assert!(matches!(result, Err(WopiError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_file_size_matches_content() {
        let service = service();
        let cancel = CancellationToken::new();

        let (content, metadata) = service.get_file("doc-1", &cancel).await.unwrap();
        assert_eq!(content.len() as u64, metadata.size_bytes);
        assert_eq!(content.as_ref(), b"spreadsheet bytes");
    }

    #[tokio::test]
    async fn test_put_unlocked_with_empty_token_writes() {
        let service = service();
        let cancel = CancellationToken::new();

        let outcome = service
            .put_file(
                "doc-1",
                WopiOverride::Put,
                &LockToken::empty(),
                Bytes::from_static(b"replaced"),
                &cancel,
            )
            .await
            .unwrap();

        assert_eq!(outcome.status, StatusCode::OK);
        assert_eq!(outcome.item_version.as_deref(), Some("2"));

        let (content, _) = service.get_file("doc-1", &cancel).await.unwrap();
        assert_eq!(content.as_ref(), b"replaced");
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let service = service();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = service
            .put_file(
                "doc-1",
                WopiOverride::Lock,
                &LockToken::new("A"),
                Bytes::new(),
                &cancel,
            )
            .await;
        assert!(matches!(result, Err(WopiError::Cancelled)));

        let info = service.check_file_info("doc-1", &user(), &cancel).await;
        assert!(matches!(info, Err(WopiError::Cancelled)));
    }
}
