//! Configuration loader with layered approach.
//!
//! The loader applies configuration in layers, with later layers overriding
//! earlier ones:
//! 1. Default values (or a preset)
//! 2. Configuration file (TOML or JSON)
//! 3. Environment variables

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, ProxenosConfig};

/// Layered configuration loader.
///
/// # Example
///
/// ```no_run
/// use proxenos_config::ConfigLoader;
///
/// # fn main() -> Result<(), proxenos_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("proxenos.toml")?
///     .with_env_prefix("PROXENOS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: ProxenosConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ProxenosConfig::default(),
            env_prefix: None,
        }
    }

    /// Start from the development preset.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = ProxenosConfig::development();
        self
    }

    /// Start from the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = ProxenosConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// Supports TOML (`.toml`) and JSON (`.json`); the format is determined
    /// by the file extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file does not exist, cannot be read, or
    /// does not parse.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from an optional file, silently continuing when
    /// it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the format is unknown.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// Variables use the format `PREFIX__SECTION__KEY`, e.g.
    /// `PROXENOS__DISCOVERY__ENDPOINT` or `PROXENOS__LOCK__TTL_SECS`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Finalize: apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment variable fails to parse or
    /// validation fails.
    pub fn load(mut self) -> Result<ProxenosConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Finalize without validation, for callers that adjust the
    /// configuration before validating.
    #[must_use]
    pub fn load_unvalidated(self) -> ProxenosConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<ProxenosConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let env_vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            ["HOST", "FILE_ENDPOINT_BASE"] => {
                self.config.host.file_endpoint_base = value.to_string();
            }

            ["DISCOVERY", "ENDPOINT"] => {
                self.config.discovery.endpoint = value.to_string();
            }
            ["DISCOVERY", "FETCH_TIMEOUT_SECS"] => {
                self.config.discovery.fetch_timeout_secs = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }

            ["LOCK", "TTL_SECS"] => {
                self.config.lock.ttl_secs = value
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }

            ["CAPABILITIES", "OWNER_ID"] => {
                self.config.capabilities.owner_id = value.to_string();
            }
            ["CAPABILITIES", "DEFAULT_BASE_FILE_NAME"] => {
                self.config.capabilities.default_base_file_name = value.to_string();
            }
            ["CAPABILITIES", "USER_CAN_WRITE"] => {
                self.config.capabilities.user_can_write = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            ["TELEMETRY", "LEVEL"] => {
                self.config.telemetry.level = value.to_string();
            }
            ["TELEMETRY", "JSON_LOGS"] => {
                self.config.telemetry.json_logs = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }

            // Unknown keys under the prefix are ignored so unrelated
            // variables sharing the prefix never break startup.
            _ => {}
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
