/*!
 * Directory walking and run control
 *
 * The scanner visits the tree depth-first in file-name order. Each
 * directory's marker gate is settled before any of its files are touched;
 * subdirectories are then visited with their own gate. Per-file failures
 * are logged, counted and never stop the walk.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::classifier::{classify, Action};
use crate::config::Config;
use crate::error::Result;
use crate::fingerprint::fingerprint;
use crate::inventory::InventoryClient;
use crate::marker::{Confirmation, DirectoryGate, MarkerStore, MarkerWrite};
use crate::report::{RunReport, RunSummary};
use crate::types::{NewFileRecord, MARKER_FILE_NAME};
use crate::utils::is_excluded;

/// Run controller for one reconciliation pass
pub struct Scanner<I: InventoryClient, C: Confirmation> {
    /// Scanner configuration
    config: Config,
    /// Remote inventory
    inventory: I,
    /// Marker gating and creation
    markers: MarkerStore<C>,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Canonical scan root, set when the run starts; walked paths stay as given
    root: PathBuf,
    /// Counters for the current run
    summary: RunSummary,
}

impl<I: InventoryClient, C: Confirmation> Scanner<I, C> {
    /// Create a new scanner
    pub fn new(
        config: Config,
        inventory: I,
        markers: MarkerStore<C>,
        progress: Arc<ProgressBar>,
    ) -> Self {
        let root = config.scan_root.clone();
        Self {
            config,
            inventory,
            markers,
            progress,
            root,
            summary: RunSummary::default(),
        }
    }

    /// Walk the scan root and return the run report
    pub fn run(&mut self) -> Result<RunReport> {
        let start = Instant::now();
        self.root = fs::canonicalize(&self.config.scan_root)?;
        self.summary = RunSummary::default();

        info!(
            "Scanning {}{}",
            self.config.scan_root.display(),
            if self.config.dry_run { " (dry run)" } else { "" }
        );

        let root = self.config.scan_root.clone();
        self.scan_directory(&root);

        Ok(RunReport {
            summary: self.summary.clone(),
            duration: start.elapsed(),
            dry_run: self.config.dry_run,
        })
    }

    /// Gate, classify and recurse into one directory
    fn scan_directory(&mut self, dir: &Path) {
        let process_files = self.resolve_gate(dir);

        let mut files = Vec::new();
        let mut subdirs = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    error!("Failed to read directory {}: {}", dir.display(), e);
                    self.summary.record_failure();
                    continue;
                }
            };

            if self.should_ignore(entry.path()) {
                debug!("Excluded {}", entry.path().display());
                continue;
            }

            let file_type = entry.file_type();
            if file_type.is_dir() {
                subdirs.push(entry.into_path());
            } else if file_type.is_file() {
                if entry.file_name() != MARKER_FILE_NAME {
                    files.push(entry.into_path());
                }
            } else {
                debug!("Skipping non-regular file {}", entry.path().display());
            }
        }

        if process_files {
            for file in &files {
                self.process_file(file);
            }
        } else {
            self.progress.inc(files.len() as u64);
        }

        for subdir in &subdirs {
            self.scan_directory(subdir);
        }
    }

    /// Consult the marker store; true when the directory's files should be classified
    fn resolve_gate(&mut self, dir: &Path) -> bool {
        match self.markers.gate(dir) {
            Ok(gate) => {
                if matches!(gate, DirectoryGate::MarkerRemoved(_)) {
                    self.summary.markers_removed += 1;
                }
                if !gate.should_process() {
                    self.summary.directories_skipped += 1;
                }
                gate.should_process()
            }
            Err(e) => {
                error!("Failed to clear marker in {}: {}", dir.display(), e);
                warn!("Skipping processing for directory {}", dir.display());
                self.summary.record_failure();
                self.summary.directories_skipped += 1;
                false
            }
        }
    }

    /// Fingerprint, classify and act on one file
    fn process_file(&mut self, path: &Path) {
        self.progress.inc(1);
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        let display_name = if file_name.len() > 40 {
            let cut = file_name
                .char_indices()
                .map(|(i, _)| i)
                .find(|&i| i >= file_name.len() - 37)
                .unwrap_or(0);
            format!("...{}", &file_name[cut..])
        } else {
            file_name.to_string()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));

        let record = match fingerprint(&self.canonical_path(path)) {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                self.summary.record_failure();
                return;
            }
        };
        self.summary.bytes_hashed += record.size;

        let matches = match self.inventory.query_by_hash(&record.content_hash) {
            Ok(matches) => matches,
            Err(e) => {
                error!("Network error during validation of {}: {}", path.display(), e);
                self.summary.record_failure();
                return;
            }
        };

        let classification = classify(&record, &matches);
        debug!(
            path = %path.display(),
            hash = %record.content_hash,
            status = %classification.status,
            "classified"
        );

        match classification.action {
            Action::CreateMarker => self.apply_deletion_directive(path),
            Action::Record => self.summary.record(classification.status),
            Action::Post(status) => {
                if self.config.dry_run {
                    info!("Dry run: would post {} as {}", path.display(), status);
                } else if let Err(e) = self
                    .inventory
                    .create(&NewFileRecord::from_local(&record, status))
                {
                    error!("Network error while posting {}: {}", path.display(), e);
                    self.summary.record_failure();
                    return;
                }
                self.summary.record(status);
            }
        }
    }

    /// Drop a marker next to a file the operator flagged for deletion
    fn apply_deletion_directive(&mut self, path: &Path) {
        let Some(dir) = path.parent() else {
            return;
        };
        info!("{} is marked for deletion", path.display());

        match self.markers.create(dir) {
            Ok(MarkerWrite::Created) | Ok(MarkerWrite::Suppressed) => {
                self.summary.markers_created += 1
            }
            Ok(MarkerWrite::AlreadyPresent) => {
                debug!("Marker already present in {}", dir.display())
            }
            Err(e) => {
                error!("{}", e);
                self.summary.record_failure();
            }
        }
    }

    /// Map a walked path onto the canonical root
    fn canonical_path(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.config.scan_root) {
            Ok(rel) => self.root.join(rel),
            Err(_) => path.to_path_buf(),
        }
    }

    /// Check a path against the default and configured exclusions
    pub fn should_ignore(&self, path: &Path) -> bool {
        let rel_path = path.strip_prefix(&self.config.scan_root).unwrap_or(path);
        is_excluded(rel_path, &self.config.excludes)
    }
}
