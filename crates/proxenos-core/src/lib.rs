//! # Proxenos Core
//!
//! Core types and capability ports for the Proxenos WOPI host.
//!
//! This crate provides the foundational pieces shared by every other crate
//! in the workspace:
//!
//! - [`WopiError`] - Unified error taxonomy with HTTP status mapping
//! - [`FileMetadata`], [`LockRecord`], [`LockToken`] - Shared value types
//! - [`UserContext`] - Caller identity surfaced in CheckFileInfo
//! - [`FileStorage`], [`LockStore`] - Capability ports implemented by
//!   injected backends

#![doc(html_root_url = "https://docs.rs/proxenos-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod ports;
mod types;

pub use error::{WopiError, WopiResult};
pub use ports::{FileStorage, LockStore, StorageError};
pub use types::{FileMetadata, LockRecord, LockToken, UserContext};
