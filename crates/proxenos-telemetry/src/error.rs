//! Telemetry error types.

use thiserror::Error;

/// Result type alias using [`TelemetryError`].
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors that can occur while initializing telemetry.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Logging initialization failed.
    #[error("logging initialization failed: {0}")]
    LoggingInit(String),
}
