/*!
 * Filizer - reconcile local files against a remote file inventory
 *
 * This library fingerprints files under a scan root, classifies each one
 * against the inventory records sharing its content hash, posts new
 * records, and manages the per-directory deletion markers that hold
 * directories back until an operator clears them.
 */

pub mod classifier;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod inventory;
pub mod logging;
pub mod marker;
pub mod report;
pub mod scanner;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use classifier::{classify, Action, Classification};
pub use config::{Args, Config, FileConfig};
pub use error::{FilizerError, Result};
pub use inventory::{HttpInventory, InventoryClient, InventoryError};
pub use marker::{Confirmation, DirectoryGate, FixedConfirmation, MarkerStore, TerminalConfirmation};
pub use report::{ReportFormat, Reporter, RunReport, RunSummary};
pub use scanner::Scanner;
pub use types::{DuplicateStatus, LocalFileRecord, NewFileRecord, RemoteFileRecord};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
