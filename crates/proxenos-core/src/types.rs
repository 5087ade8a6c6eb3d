//! Shared value types for the WOPI host core.
//!
//! These types cross crate boundaries: file metadata returned by the storage
//! port, the lock record held by the lock store, and the caller identity
//! surfaced in CheckFileInfo.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Per-file metadata as reported by the storage port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Opaque version string; changes whenever the content changes.
    pub version: String,
    /// Content length in bytes.
    pub size_bytes: u64,
}

impl FileMetadata {
    /// Creates metadata from a version string and size.
    #[must_use]
    pub fn new(version: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            version: version.into(),
            size_bytes,
        }
    }
}

/// An opaque lock token identifying the editing session that owns a lock.
///
/// Tokens are compared by exact byte equality; no trimming, case folding, or
/// other normalization is applied.
///
/// # Example
///
/// ```
/// use proxenos_core::LockToken;
///
/// let a = LockToken::new("session-1");
/// let b = LockToken::new("SESSION-1");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockToken(String);

impl LockToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The empty token, used in `X-WOPI-Lock` response headers when a file
    /// is unlocked.
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LockToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for LockToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// The current lock on a file.
///
/// Absence of a record means the file is unlocked. At most one record exists
/// per file id at any instant; the lock store's compare-and-swap discipline
/// serializes mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRecord {
    /// The locked file's id.
    pub file_id: String,
    /// The owning session's token.
    pub token: LockToken,
    /// When the lock was acquired or last refreshed.
    pub acquired_at: DateTime<Utc>,
}

impl LockRecord {
    /// Creates a lock record acquired at `now`.
    #[must_use]
    pub fn new(file_id: impl Into<String>, token: LockToken, now: DateTime<Utc>) -> Self {
        Self {
            file_id: file_id.into(),
            token,
            acquired_at: now,
        }
    }

    /// Returns a copy with the acquisition timestamp moved to `now`.
    ///
    /// Used for REFRESH_LOCK and for the idempotent same-token re-LOCK.
    #[must_use]
    pub fn refreshed(&self, now: DateTime<Utc>) -> Self {
        Self {
            file_id: self.file_id.clone(),
            token: self.token.clone(),
            acquired_at: now,
        }
    }

    /// Whether the lock is older than `ttl` at `now`.
    ///
    /// Expired locks must be treated as absent before every lock-state read.
    #[must_use]
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let Ok(ttl) = ChronoDuration::from_std(ttl) else {
            return false;
        };
        now - self.acquired_at > ttl
    }
}

/// Identity fields for the caller of a WOPI request.
///
/// Supplied by the external authentication layer; the core only echoes these
/// into CheckFileInfo and the session URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Stable user identifier.
    pub user_id: String,
    /// Display name shown by the editor.
    pub friendly_name: String,
    /// Whether the user is licensed for business use.
    pub is_business_user: bool,
}

impl UserContext {
    /// Creates a user context.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        friendly_name: impl Into<String>,
        is_business_user: bool,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            friendly_name: friendly_name.into(),
            is_business_user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_token_exact_byte_equality() {
        assert_ne!(LockToken::new("abc"), LockToken::new("abc "));
        assert_ne!(LockToken::new("abc"), LockToken::new("ABC"));
        assert_eq!(LockToken::new("abc"), LockToken::new("abc"));
    }

    #[test]
    fn test_lock_token_empty() {
        let token = LockToken::empty();
        assert!(token.is_empty());
        assert_eq!(token.as_str(), "");
    }

    #[test]
    fn test_lock_record_refresh_updates_timestamp() {
        let t0 = Utc::now();
        let record = LockRecord::new("doc-1", LockToken::new("A"), t0);
        let t1 = t0 + ChronoDuration::seconds(10);
        let refreshed = record.refreshed(t1);

        assert_eq!(refreshed.token, record.token);
        assert_eq!(refreshed.file_id, record.file_id);
        assert_eq!(refreshed.acquired_at, t1);
    }

    #[test]
    fn test_lock_record_expiry() {
        let t0 = Utc::now();
        let record = LockRecord::new("doc-1", LockToken::new("A"), t0);
        let ttl = Duration::from_secs(1800);

        assert!(!record.is_expired(ttl, t0 + ChronoDuration::seconds(1799)));
        assert!(record.is_expired(ttl, t0 + ChronoDuration::seconds(1801)));
    }

    #[test]
    fn test_lock_token_serde_transparent() {
        let token = LockToken::new("opaque-token");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"opaque-token\"");
    }

    #[test]
    fn test_file_metadata() {
        let meta = FileMetadata::new("3", 1024);
        assert_eq!(meta.version, "3");
        assert_eq!(meta.size_bytes, 1024);
    }
}
