//! # Proxenos Lock
//!
//! The WOPI lock protocol for the Proxenos host.
//!
//! - [`LockEngine`] - Pure decision table for LOCK / UNLOCK / REFRESH_LOCK /
//!   GET_LOCK / PUT, producing a [`Transition`] with the state change, the
//!   HTTP outcome, and write authorization
//! - [`WopiOverride`] - Closed instruction enum parsed from the
//!   `X-WOPI-Override` header
//! - [`InMemoryLockStore`] - Reference [`proxenos_core::LockStore`] backend
//!   with per-key compare-and-swap and TTL expiry

#![doc(html_root_url = "https://docs.rs/proxenos-lock/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod memory;

pub use engine::{LockChange, LockEngine, LockOutcome, Transition, WopiOverride};
pub use error::LockError;
pub use memory::InMemoryLockStore;
