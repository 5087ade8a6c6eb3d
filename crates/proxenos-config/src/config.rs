//! Main configuration types.
//!
//! This module provides the top-level [`ProxenosConfig`] struct and its
//! builder. Use [`ConfigLoader`](crate::ConfigLoader) to load configuration
//! from files and environment variables.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Test (pre-production) discovery endpoint.
pub const DISCOVERY_ENDPOINT_TEST: &str =
    "https://ffc-onenote.officeapps.live.com/hosting/discovery";

/// Production discovery endpoint.
pub const DISCOVERY_ENDPOINT_PRODUCTION: &str =
    "https://onenote.officeapps.live.com/hosting/discovery";

/// Complete Proxenos host configuration.
///
/// # Example
///
/// ```
/// use proxenos_config::ProxenosConfig;
///
/// let config = ProxenosConfig::default();
/// assert!(config.capabilities.supports_locks);
/// assert_eq!(config.lock.ttl_secs, 1800);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProxenosConfig {
    /// Host endpoint configuration.
    #[serde(default)]
    pub host: HostConfig,

    /// Discovery fetch configuration.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Lock lifetime configuration.
    #[serde(default)]
    pub lock: LockConfig,

    /// CheckFileInfo capability flags.
    #[serde(default)]
    pub capabilities: CapabilityConfig,

    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

/// Host endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Base URL of the host's file endpoint; `wopisrc` values are
    /// `<base>/<file_id>`.
    #[serde(default = "default_file_endpoint_base")]
    pub file_endpoint_base: String,
}

fn default_file_endpoint_base() -> String {
    "http://localhost:8080/wopi/files".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            file_endpoint_base: default_file_endpoint_base(),
        }
    }
}

/// Discovery fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Discovery document endpoint.
    #[serde(default = "default_discovery_endpoint")]
    pub endpoint: String,

    /// Upper bound on the discovery fetch, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_discovery_endpoint() -> String {
    DISCOVERY_ENDPOINT_TEST.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_discovery_endpoint(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl DiscoveryConfig {
    /// The fetch timeout as a [`Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Lock lifetime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LockConfig {
    /// Lock expiry age in seconds. WOPI convention is 30 minutes.
    #[serde(default = "default_lock_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_lock_ttl_secs() -> u64 {
    1800
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_lock_ttl_secs(),
        }
    }
}

impl LockConfig {
    /// The lock TTL as a [`Duration`].
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Fixed capability flags advertised in CheckFileInfo.
///
/// Defaults advertise lock support and direct updates while disabling
/// rename, containers, and ecosystem operations, which the host does not
/// implement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CapabilityConfig {
    /// Owner id reported for every file.
    #[serde(default = "default_owner_id")]
    pub owner_id: String,

    /// Base file name reported when the storage backend carries none.
    #[serde(default = "default_base_file_name")]
    pub default_base_file_name: String,

    /// Whether the host supports locking.
    #[serde(default = "default_true")]
    pub supports_locks: bool,

    /// Whether the host supports GET_LOCK.
    #[serde(default = "default_true")]
    pub supports_get_lock: bool,

    /// Whether lock tokens longer than 256 bytes are accepted.
    #[serde(default = "default_true")]
    pub supports_extended_lock_length: bool,

    /// Whether the host supports content updates.
    #[serde(default = "default_true")]
    pub supports_update: bool,

    /// Whether the host supports container operations.
    #[serde(default)]
    pub supports_containers: bool,

    /// Whether the host supports ecosystem operations.
    #[serde(default)]
    pub supports_ecosystem: bool,

    /// Whether the host supports renaming files.
    #[serde(default)]
    pub supports_rename: bool,

    /// Whether callers may write to files.
    #[serde(default = "default_true")]
    pub user_can_write: bool,

    /// Whether "save as" relative writes are disallowed.
    #[serde(default = "default_true")]
    pub user_can_not_write_relative: bool,

    /// Whether callers may rename files.
    #[serde(default)]
    pub user_can_rename: bool,
}

fn default_owner_id() -> String {
    "proxenos".to_string()
}

fn default_base_file_name() -> String {
    "document.xlsx".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            owner_id: default_owner_id(),
            default_base_file_name: default_base_file_name(),
            supports_locks: true,
            supports_get_lock: true,
            supports_extended_lock_length: true,
            supports_update: true,
            supports_containers: false,
            supports_ecosystem: false,
            supports_rename: false,
            user_can_write: true,
            user_can_not_write_relative: true,
            user_can_rename: false,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// Log level filter (e.g. "info", "proxenos=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to emit JSON-formatted logs.
    #[serde(default = "default_true")]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_logs: true,
        }
    }
}

impl ProxenosConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ProxenosConfigBuilder {
        ProxenosConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if an endpoint is not a valid
    /// URL or a timeout/TTL is zero.
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        if Url::parse(&self.host.file_endpoint_base).is_err() {
            return Err(crate::ConfigError::invalid_value(
                "host.file_endpoint_base",
                format!("invalid URL: {}", self.host.file_endpoint_base),
            ));
        }

        if Url::parse(&self.discovery.endpoint).is_err() {
            return Err(crate::ConfigError::invalid_value(
                "discovery.endpoint",
                format!("invalid URL: {}", self.discovery.endpoint),
            ));
        }

        if self.discovery.fetch_timeout_secs == 0 {
            return Err(crate::ConfigError::invalid_value(
                "discovery.fetch_timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.lock.ttl_secs == 0 {
            return Err(crate::ConfigError::invalid_value(
                "lock.ttl_secs",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Points at the test discovery endpoint and uses pretty debug logs.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.discovery.endpoint = DISCOVERY_ENDPOINT_TEST.to_string();
        config.telemetry.level = "debug".to_string();
        config.telemetry.json_logs = false;
        config
    }

    /// Create a production configuration preset.
    ///
    /// Points at the production discovery endpoint and uses JSON info logs.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.discovery.endpoint = DISCOVERY_ENDPOINT_PRODUCTION.to_string();
        config.telemetry.level = "info".to_string();
        config.telemetry.json_logs = true;
        config
    }
}

/// Builder for [`ProxenosConfig`].
#[derive(Debug, Default)]
pub struct ProxenosConfigBuilder {
    host: Option<HostConfig>,
    discovery: Option<DiscoveryConfig>,
    lock: Option<LockConfig>,
    capabilities: Option<CapabilityConfig>,
    telemetry: Option<TelemetrySection>,
}

impl ProxenosConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host configuration.
    #[must_use]
    pub fn host(mut self, host: HostConfig) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the discovery configuration.
    #[must_use]
    pub fn discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.discovery = Some(discovery);
        self
    }

    /// Set the lock configuration.
    #[must_use]
    pub fn lock(mut self, lock: LockConfig) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Set the capability flags.
    #[must_use]
    pub fn capabilities(mut self, capabilities: CapabilityConfig) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Set the telemetry section.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetrySection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> ProxenosConfig {
        ProxenosConfig {
            host: self.host.unwrap_or_default(),
            discovery: self.discovery.unwrap_or_default(),
            lock: self.lock.unwrap_or_default(),
            capabilities: self.capabilities.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<ProxenosConfig, crate::ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
