//! In-memory lock store backend.
//!
//! Suitable for single-process deployments and tests. Per-key atomicity
//! comes from the map's entry API: a compare-and-swap holds exactly one
//! key's shard lock, so operations on distinct file ids never contend.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use proxenos_core::{LockRecord, LockStore, LockToken, StorageError};
use std::time::Duration;
use tracing::debug;

/// Lock store holding records in process memory.
///
/// Locks older than the configured TTL read as absent from both `get` and
/// `compare_and_swap`, so an expired owner can never block a new session.
#[derive(Debug)]
pub struct InMemoryLockStore {
    ttl: Duration,
    locks: DashMap<String, LockRecord>,
}

impl InMemoryLockStore {
    /// Creates a store whose locks expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            locks: DashMap::new(),
        }
    }

    /// Number of live (possibly expired, not yet reaped) records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns `true` when no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl LockStore for InMemoryLockStore {
    async fn get(&self, file_id: &str) -> Result<Option<LockRecord>, StorageError> {
        let now = Utc::now();

        // Reap on read so expired owners disappear instead of lingering.
        if let Some((_, expired)) = self
            .locks
            .remove_if(file_id, |_, record| record.is_expired(self.ttl, now))
        {
            debug!(file_id, token = %expired.token, "expired lock reaped");
        }

        Ok(self.locks.get(file_id).map(|record| record.value().clone()))
    }

    async fn compare_and_swap(
        &self,
        file_id: &str,
        expected: Option<&LockToken>,
        next: Option<LockRecord>,
    ) -> Result<bool, StorageError> {
        let now = Utc::now();

        match self.locks.entry(file_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let current = if occupied.get().is_expired(self.ttl, now) {
                    None
                } else {
                    Some(&occupied.get().token)
                };

                let matches = match (current, expected) {
                    (Some(held), Some(token)) => held == token,
                    (None, None) => true,
                    _ => false,
                };
                if !matches {
                    return Ok(false);
                }

                match next {
                    Some(record) => {
                        occupied.insert(record);
                    }
                    None => {
                        occupied.remove();
                    }
                }
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                if expected.is_some() {
                    return Ok(false);
                }
                if let Some(record) = next {
                    vacant.insert(record);
                }
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(1800);

    fn record(file_id: &str, token: &str) -> LockRecord {
        LockRecord::new(file_id, LockToken::new(token), Utc::now())
    }

    #[tokio::test]
    async fn test_cas_from_unlocked() {
        let store = InMemoryLockStore::new(TTL);

        assert!(store
            .compare_and_swap("doc-1", None, Some(record("doc-1", "A")))
            .await
            .unwrap());

        let held = store.get("doc-1").await.unwrap().unwrap();
        assert_eq!(held.token, LockToken::new("A"));
    }

    #[tokio::test]
    async fn test_cas_rejects_stale_expectation() {
        let store = InMemoryLockStore::new(TTL);
        store
            .compare_and_swap("doc-1", None, Some(record("doc-1", "A")))
            .await
            .unwrap();

        // Expecting unlocked while locked fails.
        assert!(!store
            .compare_and_swap("doc-1", None, Some(record("doc-1", "B")))
            .await
            .unwrap());

        // Expecting the wrong token fails.
        assert!(!store
            .compare_and_swap("doc-1", Some(&LockToken::new("B")), None)
            .await
            .unwrap());

        // The holder is unchanged.
        let held = store.get("doc-1").await.unwrap().unwrap();
        assert_eq!(held.token, LockToken::new("A"));
    }

    #[tokio::test]
    async fn test_cas_release() {
        let store = InMemoryLockStore::new(TTL);
        store
            .compare_and_swap("doc-1", None, Some(record("doc-1", "A")))
            .await
            .unwrap();

        assert!(store
            .compare_and_swap("doc-1", Some(&LockToken::new("A")), None)
            .await
            .unwrap());
        assert!(store.get("doc-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_lock_reads_as_absent() {
        let store = InMemoryLockStore::new(TTL);
        let stale = LockRecord {
            file_id: "doc-1".to_string(),
            token: LockToken::new("A"),
            acquired_at: Utc::now() - ChronoDuration::seconds(3600),
        };
        store
            .compare_and_swap("doc-1", None, Some(stale))
            .await
            .unwrap();

        assert!(store.get("doc-1").await.unwrap().is_none());

        // A new session can lock immediately.
        assert!(store
            .compare_and_swap("doc-1", None, Some(record("doc-1", "B")))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_distinct_file_ids_are_independent() {
        let store = InMemoryLockStore::new(TTL);
        store
            .compare_and_swap("doc-1", None, Some(record("doc-1", "A")))
            .await
            .unwrap();
        store
            .compare_and_swap("doc-2", None, Some(record("doc-2", "B")))
            .await
            .unwrap();

        assert_eq!(
            store.get("doc-1").await.unwrap().unwrap().token,
            LockToken::new("A")
        );
        assert_eq!(
            store.get("doc-2").await.unwrap().unwrap().token,
            LockToken::new("B")
        );
    }

    #[tokio::test]
    async fn test_concurrent_cas_has_exactly_one_winner() {
        let store = Arc::new(InMemoryLockStore::new(TTL));
        let wins = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            let wins = Arc::clone(&wins);
            handles.push(tokio::spawn(async move {
                let token = format!("session-{i}");
                let won = store
                    .compare_and_swap("doc-1", None, Some(record("doc-1", &token)))
                    .await
                    .unwrap();
                if won {
                    wins.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert!(store.get("doc-1").await.unwrap().is_some());
    }
}
