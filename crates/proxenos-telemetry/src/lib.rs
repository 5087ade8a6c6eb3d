//! # Proxenos Telemetry
//!
//! Structured logging bootstrap for the Proxenos WOPI host.
//!
//! Call [`init_logging`] once at startup with a [`LogConfig`]; all crates
//! in the workspace log through `tracing` with the field names in
//! [`logging::fields`].

#![doc(html_root_url = "https://docs.rs/proxenos-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogConfig};
