//! The CheckFileInfo descriptor.
//!
//! Combines the host's fixed capability flags with per-file metadata and
//! the caller's identity. Serializes to the PascalCase JSON shape the
//! editor consumes.

use proxenos_config::CapabilityConfig;
use proxenos_core::{FileMetadata, UserContext};
use serde::{Deserialize, Serialize};

/// CheckFileInfo response body.
///
/// # Example
///
/// ```
/// use proxenos_config::CapabilityConfig;
/// use proxenos_core::{FileMetadata, UserContext};
/// use proxenos_files::FileInfo;
///
/// let info = FileInfo::new(
///     &CapabilityConfig::default(),
///     &UserContext::new("u-1", "Ada", true),
///     FileMetadata::new("3", 2048),
/// );
/// let json = serde_json::to_string(&info).unwrap();
/// assert!(json.contains("\"SupportsLocks\":true"));
/// assert!(json.contains("\"Size\":2048"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileInfo {
    /// File name shown in the editor chrome.
    pub base_file_name: String,
    /// Owner of the file.
    pub owner_id: String,
    /// The calling user's id.
    pub user_id: String,
    /// The calling user's display name.
    pub user_friendly_name: String,
    /// Content length in bytes.
    pub size: u64,
    /// Current file version.
    pub version: String,

    /// Whether the host supports locking.
    pub supports_locks: bool,
    /// Whether the host supports GET_LOCK.
    pub supports_get_lock: bool,
    /// Whether lock tokens longer than 256 bytes are accepted.
    pub supports_extended_lock_length: bool,
    /// Whether the host supports content updates.
    pub supports_update: bool,
    /// Whether the host supports container operations.
    pub supports_containers: bool,
    /// Whether the host supports ecosystem operations.
    pub supports_ecosystem: bool,
    /// Whether the host supports renaming.
    pub supports_rename: bool,

    /// Whether the caller may write to the file.
    pub user_can_write: bool,
    /// Whether "save as" relative writes are disallowed.
    pub user_can_not_write_relative: bool,
    /// Whether the caller may rename the file.
    pub user_can_rename: bool,
}

impl FileInfo {
    /// Builds the descriptor from capability configuration, caller
    /// identity, and per-file metadata.
    #[must_use]
    pub fn new(
        capabilities: &CapabilityConfig,
        user: &UserContext,
        metadata: FileMetadata,
    ) -> Self {
        Self {
            base_file_name: capabilities.default_base_file_name.clone(),
            owner_id: capabilities.owner_id.clone(),
            user_id: user.user_id.clone(),
            user_friendly_name: user.friendly_name.clone(),
            size: metadata.size_bytes,
            version: metadata.version,
            supports_locks: capabilities.supports_locks,
            supports_get_lock: capabilities.supports_get_lock,
            supports_extended_lock_length: capabilities.supports_extended_lock_length,
            supports_update: capabilities.supports_update,
            supports_containers: capabilities.supports_containers,
            supports_ecosystem: capabilities.supports_ecosystem,
            supports_rename: capabilities.supports_rename,
            user_can_write: capabilities.user_can_write,
            user_can_not_write_relative: capabilities.user_can_not_write_relative,
            user_can_rename: capabilities.user_can_rename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> FileInfo {
        FileInfo::new(
            &CapabilityConfig::default(),
            &UserContext::new("user-7", "Ada Lovelace", false),
            FileMetadata::new("12", 4096),
        )
    }

    #[test]
    fn test_pascal_case_field_names() {
        let json = serde_json::to_value(info()).unwrap();
        assert!(json.get("BaseFileName").is_some());
        assert!(json.get("UserId").is_some());
        assert!(json.get("SupportsExtendedLockLength").is_some());
        assert!(json.get("UserCanNotWriteRelative").is_some());
        // No snake_case leakage.
        assert!(json.get("base_file_name").is_none());
    }

    #[test]
    fn test_capability_defaults() {
        let descriptor = info();
        assert!(descriptor.supports_locks);
        assert!(descriptor.supports_get_lock);
        assert!(descriptor.supports_update);
        assert!(!descriptor.supports_containers);
        assert!(!descriptor.supports_ecosystem);
        assert!(!descriptor.supports_rename);
        assert!(!descriptor.user_can_rename);
    }

    #[test]
    fn test_per_file_and_caller_fields() {
        let descriptor = info();
        assert_eq!(descriptor.user_id, "user-7");
        assert_eq!(descriptor.user_friendly_name, "Ada Lovelace");
        assert_eq!(descriptor.size, 4096);
        assert_eq!(descriptor.version, "12");
    }
}
