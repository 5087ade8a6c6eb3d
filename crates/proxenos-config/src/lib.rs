//! # Proxenos Config
//!
//! Typed configuration system for the Proxenos WOPI host.
//!
//! Configuration is applied in layers: built-in defaults (or a preset),
//! then an optional TOML/JSON file, then `PROXENOS__SECTION__KEY`
//! environment variables. The [`ProxenosConfig::development`] and
//! [`ProxenosConfig::production`] presets switch between the vendor's test
//! and production discovery endpoints.

#![doc(html_root_url = "https://docs.rs/proxenos-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{
    CapabilityConfig, DiscoveryConfig, HostConfig, LockConfig, ProxenosConfig,
    ProxenosConfigBuilder, TelemetrySection, DISCOVERY_ENDPOINT_PRODUCTION,
    DISCOVERY_ENDPOINT_TEST,
};
pub use error::ConfigError;
pub use loader::ConfigLoader;
