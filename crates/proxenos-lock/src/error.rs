//! Lock protocol error types.
//!
//! The engine itself is pure and lock conflicts are outcomes, not errors;
//! the only failure the protocol layer can produce is an unrecognized
//! override instruction.

use proxenos_core::WopiError;
use thiserror::Error;

/// Errors surfaced by the lock protocol layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// The `X-WOPI-Override` header carried a value outside the supported
    /// instruction set.
    #[error("unsupported WOPI override '{value}'")]
    UnsupportedOverride {
        /// The raw header value.
        value: String,
    },
}

impl LockError {
    /// Creates an unsupported-override error.
    #[must_use]
    pub fn unsupported_override(value: impl Into<String>) -> Self {
        Self::UnsupportedOverride {
            value: value.into(),
        }
    }
}

impl From<LockError> for WopiError {
    fn from(error: LockError) -> Self {
        match error {
            LockError::UnsupportedOverride { value } => WopiError::UnsupportedOverride { value },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_unsupported_override_maps_to_501() {
        let error: WopiError = LockError::unsupported_override("RENAME_FILE").into();
        assert_eq!(error.status_code(), StatusCode::NOT_IMPLEMENTED);
        assert!(error.to_string().contains("RENAME_FILE"));
    }
}
