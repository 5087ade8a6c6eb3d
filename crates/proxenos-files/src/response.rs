//! WOPI response assembly.
//!
//! Routing stays outside this crate; these helpers produce the exact
//! header and body shapes the WOPI contract requires so every transport
//! emits them identically:
//!
//! - CheckFileInfo: JSON descriptor
//! - GetFile: raw bytes with `Content-Type`, `Content-Length`, and
//!   `X-WOPI-ItemVersion`
//! - Lock overrides: status plus `X-WOPI-Lock` / `X-WOPI-ItemVersion`

use crate::info::FileInfo;
use crate::service::PutOutcome;
use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{Response, StatusCode};
use proxenos_core::{FileMetadata, WopiError, WopiResult};

/// WOPI header names.
pub mod headers {
    /// Request header carrying the override instruction.
    pub const WOPI_OVERRIDE: &str = "X-WOPI-Override";
    /// Request and response header carrying a lock token.
    pub const WOPI_LOCK: &str = "X-WOPI-Lock";
    /// Response header carrying the file version.
    pub const WOPI_ITEM_VERSION: &str = "X-WOPI-ItemVersion";
}

/// Builds the CheckFileInfo response.
///
/// # Errors
///
/// Returns [`WopiError::Internal`] if the descriptor fails to serialize.
pub fn check_file_info_response(info: &FileInfo) -> WopiResult<Response<Bytes>> {
    let body = serde_json::to_vec(info)
        .map_err(|e| WopiError::internal(format!("failed to serialize file info: {e}")))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .body(Bytes::from(body))
        .map_err(|e| WopiError::internal(format!("failed to build response: {e}")))
}

/// Builds the GetFile contents response.
///
/// `Content-Length` is taken from the metadata, which the service has
/// already checked against the body length.
///
/// # Errors
///
/// Returns [`WopiError::Internal`] if a header value is invalid.
pub fn file_content_response(
    content: Bytes,
    metadata: &FileMetadata,
) -> WopiResult<Response<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/octet-stream")
        .header(CONTENT_LENGTH, metadata.size_bytes)
        .header(headers::WOPI_ITEM_VERSION, metadata.version.as_str())
        .body(content)
        .map_err(|e| WopiError::internal(format!("failed to build response: {e}")))
}

/// Builds the response for a lock-protocol override outcome.
///
/// # Errors
///
/// Returns [`WopiError::Internal`] if the lock token is not a valid header
/// value.
pub fn lock_outcome_response(outcome: &PutOutcome) -> WopiResult<Response<Bytes>> {
    let mut builder = Response::builder().status(outcome.status);

    if let Some(token) = &outcome.lock_header {
        builder = builder.header(headers::WOPI_LOCK, token.as_str());
    }
    if let Some(version) = &outcome.item_version {
        builder = builder.header(headers::WOPI_ITEM_VERSION, version.as_str());
    }

    builder
        .body(Bytes::new())
        .map_err(|e| WopiError::internal(format!("failed to build response: {e}")))
}

/// Builds an error response from the unified taxonomy: the mapped status
/// code with a small JSON body carrying the machine-readable code.
#[must_use]
pub fn error_response(error: &WopiError) -> Response<Bytes> {
    let body = serde_json::json!({
        "code": error.error_code(),
        "message": error.to_string(),
    });
    let body = Bytes::from(body.to_string());

    // Status and fixed header names cannot fail to build.
    Response::builder()
        .status(error.status_code())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap_or_default()
}
