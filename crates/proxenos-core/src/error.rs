//! Error types for Proxenos.
//!
//! This module provides the [`WopiError`] type, the unified error taxonomy
//! for the WOPI host core. Every failure a component can surface maps onto
//! one of these variants, and the surrounding HTTP layer maps each variant
//! to a status code via [`WopiError::status_code`].
//!
//! Lock conflicts are deliberately **not** part of this taxonomy: a 409 with
//! the current lock token is a normal protocol outcome and is returned as
//! data by the lock engine, never as an error.

use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`WopiError`].
pub type WopiResult<T> = Result<T, WopiError>;

/// Unified error type for the Proxenos WOPI host core.
///
/// # Example
///
/// ```
/// use proxenos_core::WopiError;
/// use http::StatusCode;
///
/// let error = WopiError::file_not_found("doc-42");
/// assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Error, Debug)]
pub enum WopiError {
    /// The discovery endpoint could not be reached or answered non-2xx.
    #[error("discovery unavailable: {message}")]
    DiscoveryUnavailable {
        /// Human-readable error message.
        message: String,
        /// The underlying transport error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The discovery document was fetched but required elements or
    /// attributes were absent.
    #[error("discovery document malformed: {message}")]
    DiscoveryMalformed {
        /// Human-readable error message.
        message: String,
    },

    /// No action of the requested kind is registered for the extension.
    #[error("no {action} action for extension '{extension}'")]
    ActionNotFound {
        /// The action kind that was looked up (view/edit/...).
        action: String,
        /// The file extension that had no match.
        extension: String,
    },

    /// The caller supplied a language tag outside the locale table.
    #[error("unsupported language tag '{language_tag}'")]
    UnsupportedLanguage {
        /// The unmapped language tag.
        language_tag: String,
    },

    /// The `X-WOPI-Override` header carried an unrecognized instruction.
    #[error("unsupported WOPI override '{value}'")]
    UnsupportedOverride {
        /// The raw header value.
        value: String,
    },

    /// The storage port could not resolve the file id.
    #[error("file '{file_id}' not found")]
    FileNotFound {
        /// The unresolved file id.
        file_id: String,
    },

    /// The storage or lock backend failed.
    #[error("storage failure: {message}")]
    Storage {
        /// Human-readable error message.
        message: String,
        /// The underlying backend error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The lock state was committed but the subsequent content write
    /// failed. The caller holds the lock and may retry the PUT without
    /// re-acquiring it.
    #[error("lock state committed for '{file_id}' but content write failed")]
    PersistedLockButWriteFailed {
        /// The file whose content write failed.
        file_id: String,
        /// The storage error that aborted the write.
        #[source]
        source: anyhow::Error,
    },

    /// The operation was cancelled by the caller's cancellation signal.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal invariant violation.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
    },
}

impl WopiError {
    /// Creates a discovery-unavailable error without a source.
    #[must_use]
    pub fn discovery_unavailable(message: impl Into<String>) -> Self {
        Self::DiscoveryUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a discovery-malformed error.
    #[must_use]
    pub fn discovery_malformed(message: impl Into<String>) -> Self {
        Self::DiscoveryMalformed {
            message: message.into(),
        }
    }

    /// Creates an action-not-found error.
    #[must_use]
    pub fn action_not_found(action: impl Into<String>, extension: impl Into<String>) -> Self {
        Self::ActionNotFound {
            action: action.into(),
            extension: extension.into(),
        }
    }

    /// Creates an unsupported-language error.
    #[must_use]
    pub fn unsupported_language(language_tag: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            language_tag: language_tag.into(),
        }
    }

    /// Creates an unsupported-override error.
    #[must_use]
    pub fn unsupported_override(value: impl Into<String>) -> Self {
        Self::UnsupportedOverride {
            value: value.into(),
        }
    }

    /// Creates a file-not-found error.
    #[must_use]
    pub fn file_not_found(file_id: impl Into<String>) -> Self {
        Self::FileNotFound {
            file_id: file_id.into(),
        }
    }

    /// Creates a storage error without a source.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a storage error wrapping a backend error.
    pub fn storage_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::DiscoveryUnavailable { .. } | Self::DiscoveryMalformed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            Self::ActionNotFound { .. } | Self::FileNotFound { .. } => StatusCode::NOT_FOUND,
            Self::UnsupportedLanguage { .. } => StatusCode::BAD_REQUEST,
            Self::UnsupportedOverride { .. } => StatusCode::NOT_IMPLEMENTED,
            Self::Storage { .. }
            | Self::PersistedLockButWriteFailed { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cancelled => StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// Returns a machine-readable error code for response envelopes.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DiscoveryUnavailable { .. } => "DISCOVERY_UNAVAILABLE",
            Self::DiscoveryMalformed { .. } => "DISCOVERY_MALFORMED",
            Self::ActionNotFound { .. } => "ACTION_NOT_FOUND",
            Self::UnsupportedLanguage { .. } => "UNSUPPORTED_LANGUAGE",
            Self::UnsupportedOverride { .. } => "UNSUPPORTED_OVERRIDE",
            Self::FileNotFound { .. } => "FILE_NOT_FOUND",
            Self::Storage { .. } => "STORAGE_FAILURE",
            Self::PersistedLockButWriteFailed { .. } => "PERSISTED_LOCK_WRITE_FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_mapping() {
        let error = WopiError::file_not_found("doc-1");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.error_code(), "FILE_NOT_FOUND");
        assert!(error.to_string().contains("doc-1"));
    }

    #[test]
    fn test_discovery_errors_map_to_bad_gateway() {
        let unavailable = WopiError::discovery_unavailable("connection refused");
        let malformed = WopiError::discovery_malformed("missing urlsrc");
        assert_eq!(unavailable.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(malformed.status_code(), StatusCode::BAD_GATEWAY);
        assert_ne!(unavailable.error_code(), malformed.error_code());
    }

    #[test]
    fn test_unsupported_override_is_not_implemented() {
        let error = WopiError::unsupported_override("RENAME_FILE");
        assert_eq!(error.status_code(), StatusCode::NOT_IMPLEMENTED);
        assert!(error.to_string().contains("RENAME_FILE"));
    }

    #[test]
    fn test_unsupported_language_is_bad_request() {
        let error = WopiError::unsupported_language("tlh");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_persisted_lock_write_failed_is_distinct() {
        let error = WopiError::PersistedLockButWriteFailed {
            file_id: "doc-7".to_string(),
            source: anyhow::anyhow!("disk full"),
        };
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_code(), "PERSISTED_LOCK_WRITE_FAILED");
        assert_ne!(error.error_code(), WopiError::storage("x").error_code());
    }

    #[test]
    fn test_cancelled() {
        let error = WopiError::Cancelled;
        assert_eq!(error.error_code(), "CANCELLED");
        assert_eq!(error.status_code(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_storage_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "backend down");
        let error = WopiError::storage_with_source("write failed", io);
        assert!(std::error::Error::source(&error).is_some());
    }
}
