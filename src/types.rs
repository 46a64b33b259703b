/*!
 * Core types and data structures for filizer
 */

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Name of the sentinel file that gates a directory after a deletion directive
pub const MARKER_FILE_NAME: &str = "MARKED_FOR_DELETION";

/// Operator action string meaning "delete this file"
pub const DELETION_ACTION: &str = "marked_for_deletion";

/// Outcome of comparing one local file against the remote inventory
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicateStatus {
    /// No remote record shares this hash
    None,
    /// Hash matches but name and/or parent directory differ
    DuplicateContents,
    /// Hash, name and parent directory match, full path differs
    Duplicate,
    /// Hash and full path match an existing record
    PreviouslyScanned,
    /// A matching record carries the deletion directive
    MarkedForDeletion,
}

/// A file found on the local filesystem, fingerprinted and ready to classify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileRecord {
    /// Base file name
    pub name: String,
    /// Name of the containing directory
    pub parent_dir: String,
    /// Absolute path
    pub full_path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Coarse type tag derived from the extension
    pub kind: String,
    /// Lowercase hex MD5 of the contents
    pub content_hash: String,
}

impl LocalFileRecord {
    /// Full path rendered the way the inventory stores it
    pub fn full_path_string(&self) -> String {
        self.full_path.to_string_lossy().into_owned()
    }
}

/// A record held by the remote inventory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteFileRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent_dir: String,
    #[serde(default)]
    pub full_path: String,
    #[serde(rename = "md5", default)]
    pub content_hash: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub action_args: Option<String>,
}

impl RemoteFileRecord {
    /// Whether an operator flagged this record for deletion
    pub fn is_marked_for_deletion(&self) -> bool {
        self.action
            .as_deref()
            .is_some_and(|a| a.trim().eq_ignore_ascii_case(DELETION_ACTION))
    }
}

/// Body of a create-record request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFileRecord {
    pub name: String,
    pub size: u64,
    pub kind: String,
    pub md5: String,
    pub parent_dir: String,
    pub full_path: String,
    pub duplicate_status: DuplicateStatus,
}

impl NewFileRecord {
    /// Build a create-record body from a local file and its classification
    pub fn from_local(record: &LocalFileRecord, status: DuplicateStatus) -> Self {
        Self {
            name: record.name.clone(),
            size: record.size,
            kind: record.kind.clone(),
            md5: record.content_hash.clone(),
            parent_dir: record.parent_dir.clone(),
            full_path: record.full_path_string(),
            duplicate_status: status,
        }
    }
}
