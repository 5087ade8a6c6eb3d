//! Discovery error types.

use proxenos_core::WopiError;
use thiserror::Error;

/// Result type alias using [`DiscoveryError`].
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Errors surfaced by discovery resolution and action URL construction.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The discovery endpoint could not be reached or answered non-2xx.
    #[error("discovery endpoint unavailable: {message}")]
    Unavailable {
        /// Human-readable error message.
        message: String,
        /// The underlying transport error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The discovery document is missing required elements or attributes,
    /// or an action URL template does not parse.
    #[error("discovery document malformed: {message}")]
    Malformed {
        /// Human-readable error message.
        message: String,
    },

    /// No action of the requested kind exists for the extension.
    #[error("no {action} action registered for extension '{extension}'")]
    ActionNotFound {
        /// The action kind that was looked up.
        action: String,
        /// The extension with no match.
        extension: String,
    },

    /// The caller's language tag has no locale mapping.
    #[error("unsupported language tag '{language_tag}'")]
    UnsupportedLanguage {
        /// The unmapped language tag.
        language_tag: String,
    },

    /// Resolution was cancelled by the caller's cancellation signal.
    #[error("discovery resolution cancelled")]
    Cancelled,
}

impl DiscoveryError {
    /// Creates an unavailable error without a source.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unavailable error wrapping a transport error.
    pub fn unavailable_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a malformed-document error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
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
}

impl From<DiscoveryError> for WopiError {
    fn from(error: DiscoveryError) -> Self {
        match error {
            DiscoveryError::Unavailable { message, source } => {
                WopiError::DiscoveryUnavailable { message, source }
            }
            DiscoveryError::Malformed { message } => WopiError::DiscoveryMalformed { message },
            DiscoveryError::ActionNotFound { action, extension } => {
                WopiError::ActionNotFound { action, extension }
            }
            DiscoveryError::UnsupportedLanguage { language_tag } => {
                WopiError::UnsupportedLanguage { language_tag }
            }
            DiscoveryError::Cancelled => WopiError::Cancelled,
        }
    }
}
