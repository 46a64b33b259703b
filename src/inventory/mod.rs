//! Remote inventory client
//!
//! The reconciliation engine only needs two calls from the inventory
//! service: look up every record sharing a content hash, and create a new
//! record. Both sit behind [`InventoryClient`] so the run controller can be
//! driven by the HTTP client in production and by an in-memory double in
//! tests.

mod error;
mod http;

pub use error::{InventoryError, InventoryResult};
pub use http::{HttpInventory, VersionInfo};

use crate::types::{NewFileRecord, RemoteFileRecord};

/// Operations the run controller needs from the remote inventory
pub trait InventoryClient: Send + Sync {
    /// All records whose stored hash equals `hash`; empty when none
    fn query_by_hash(&self, hash: &str) -> InventoryResult<Vec<RemoteFileRecord>>;

    /// Persist one new record
    fn create(&self, record: &NewFileRecord) -> InventoryResult<()>;
}

impl<T: InventoryClient + ?Sized> InventoryClient for &T {
    fn query_by_hash(&self, hash: &str) -> InventoryResult<Vec<RemoteFileRecord>> {
        (**self).query_by_hash(hash)
    }

    fn create(&self, record: &NewFileRecord) -> InventoryResult<()> {
        (**self).create(record)
    }
}

/// Compare dotted numeric versions, treating missing components as zero
pub fn version_at_least(version: &str, minimum: &str) -> bool {
    fn parts(v: &str) -> Vec<u64> {
        v.trim()
            .trim_start_matches('v')
            .split(|c: char| c == '.' || c == '-' || c == '+')
            .take(3)
            .map(|p| p.parse().unwrap_or(0))
            .collect()
    }

    let (have, want) = (parts(version), parts(minimum));
    let len = have.len().max(want.len());
    for i in 0..len {
        let h = have.get(i).copied().unwrap_or(0);
        let w = want.get(i).copied().unwrap_or(0);
        if h != w {
            return h > w;
        }
    }
    true
}
