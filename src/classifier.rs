/*!
 * Classification of a local file against remote records sharing its hash
 */

use crate::types::{DuplicateStatus, LocalFileRecord, RemoteFileRecord};

/// What the run controller should do with a classified file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a record carrying the given status
    Post(DuplicateStatus),
    /// Only count the file
    Record,
    /// Drop the deletion marker into the file's directory
    CreateMarker,
}

/// Result of classifying one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: DuplicateStatus,
    pub action: Action,
}

impl Classification {
    fn new(status: DuplicateStatus, action: Action) -> Self {
        Self { status, action }
    }
}

/// Classify `local` against every remote record sharing its content hash.
///
/// The checks run in a fixed order and the first one that holds wins:
/// deletion directive, same full path, same name and parent directory,
/// any hash match, no match at all. Several checks can hold for the same
/// record set, so the order is part of the contract.
pub fn classify(local: &LocalFileRecord, matches: &[RemoteFileRecord]) -> Classification {
    // Guard against an inventory that ignores the hash filter
    let matches: Vec<&RemoteFileRecord> = matches
        .iter()
        .filter(|r| {
            r.content_hash.is_empty() || r.content_hash.eq_ignore_ascii_case(&local.content_hash)
        })
        .collect();

    if matches.iter().any(|r| r.is_marked_for_deletion()) {
        return Classification::new(DuplicateStatus::MarkedForDeletion, Action::CreateMarker);
    }

    let full_path = local.full_path_string();
    if matches.iter().any(|r| r.full_path == full_path) {
        return Classification::new(DuplicateStatus::PreviouslyScanned, Action::Record);
    }

    if matches
        .iter()
        .any(|r| r.name == local.name && r.parent_dir == local.parent_dir)
    {
        return Classification::new(DuplicateStatus::Duplicate, Action::Record);
    }

    if !matches.is_empty() {
        return Classification::new(
            DuplicateStatus::DuplicateContents,
            Action::Post(DuplicateStatus::DuplicateContents),
        );
    }

    Classification::new(DuplicateStatus::None, Action::Post(DuplicateStatus::None))
}
