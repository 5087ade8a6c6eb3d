//! # Proxenos
//!
//! **WOPI host core for browser-based document editing**
//!
//! Proxenos implements the two engines a WOPI host lives or dies by:
//!
//! - **Discovery** – Fetch the editor vendor's discovery document once,
//!   index it by `(action, extension)`, and build the session URL a browser
//!   navigates to
//! - **Locking** – The WOPI file-lock state machine (LOCK, UNLOCK,
//!   REFRESH_LOCK, GET_LOCK, PUT) with strict token identity and conflict
//!   signaling, orchestrated by a file access service over injected storage
//!   and lock-store backends
//!
//! Routing, authentication, and durable storage are the surrounding
//! application's concern; this crate hands it typed outcomes and ready-made
//! WOPI response shapes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use proxenos::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().with_env_prefix("PROXENOS").load()?;
//!
//! let resolver = DiscoveryResolver::new(
//!     HttpDiscoveryFetcher::new(config.discovery.fetch_timeout())?,
//!     Url::parse(&config.discovery.endpoint)?,
//! );
//!
//! let service = FileAccessService::new(
//!     Arc::new(InMemoryFileStorage::new()),
//!     Arc::new(InMemoryLockStore::new(config.lock.ttl())),
//!     config.capabilities.clone(),
//! );
//!
//! let cancel = CancellationToken::new();
//! let action = resolver.find_edit("xlsx", &cancel).await?;
//! let session_url = build_action_url(
//!     &action,
//!     "1234",
//!     &Url::parse(&config.host.file_endpoint_base)?,
//!     &UrlOptions::default(),
//! )?;
//! # let _ = (service, session_url);
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/proxenos/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use proxenos_core as core;

// Re-export discovery types
pub use proxenos_discovery as discovery;

// Re-export lock protocol types
pub use proxenos_lock as lock;

// Re-export file access types
pub use proxenos_files as files;

// Re-export configuration types
pub use proxenos_config as config;

// Re-export telemetry types
pub use proxenos_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use proxenos::prelude::*;
/// ```
pub mod prelude {
    pub use proxenos_core::{
        FileMetadata, FileStorage, LockRecord, LockStore, LockToken, StorageError, UserContext,
        WopiError, WopiResult,
    };

    // Re-export discovery types
    pub use proxenos_discovery::{
        build_action_url, Action, ActionName, Application, DiscoveryError, DiscoveryIndex,
        DiscoveryResolver, HttpDiscoveryFetcher, UrlOptions,
    };

    // Re-export lock protocol types
    pub use proxenos_lock::{
        InMemoryLockStore, LockChange, LockEngine, LockOutcome, Transition, WopiOverride,
    };

    // Re-export file access types
    pub use proxenos_files::{FileAccessService, FileInfo, InMemoryFileStorage, PutOutcome};

    // Re-export configuration types
    pub use proxenos_config::{ConfigLoader, ProxenosConfig};

    // Re-export telemetry types
    pub use proxenos_telemetry::{init_logging, LogConfig};

    // Cancellation signal accepted by the core's contracts
    pub use tokio_util::sync::CancellationToken;
}
