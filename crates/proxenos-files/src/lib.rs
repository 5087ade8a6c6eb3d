//! # Proxenos Files
//!
//! The file access service for the Proxenos WOPI host.
//!
//! - [`FileAccessService`] - Answers CheckFileInfo / GetFile / PutFile over
//!   injected [`proxenos_core::FileStorage`] and [`proxenos_core::LockStore`]
//!   backends, running lock-protocol overrides through the engine with a
//!   per-file compare-and-swap commit
//! - [`FileInfo`] - The CheckFileInfo descriptor
//! - [`response`] - WOPI header constants and `http::Response` assembly
//! - [`InMemoryFileStorage`] - Reference storage backend

#![doc(html_root_url = "https://docs.rs/proxenos-files/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod info;
mod memory;
pub mod response;
mod service;

pub use info::FileInfo;
pub use memory::InMemoryFileStorage;
pub use service::{FileAccessService, PutOutcome};
