/*!
 * Per-directory deletion markers
 *
 * A marker is an empty file named `MARKED_FOR_DELETION` placed directly in
 * a directory. It is written when the inventory reports that an operator
 * flagged one of the directory's files for deletion, and on every later
 * run it holds the directory back until the operator agrees to clear it.
 */

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use dialoguer::Confirm;
use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::error::{FilizerError, Result};
use crate::types::MARKER_FILE_NAME;

/// Source of yes/no answers for marker removal
pub trait Confirmation {
    /// Ask the operator a yes/no question
    fn confirm(&self, prompt: &str) -> bool;
}

impl<T: Confirmation + ?Sized> Confirmation for Box<T> {
    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Asks on the terminal, with the progress bar cleared while waiting
#[derive(Debug, Clone)]
pub struct TerminalConfirmation {
    progress: ProgressBar,
}

impl TerminalConfirmation {
    pub fn new(progress: ProgressBar) -> Self {
        Self { progress }
    }
}

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        let answer = self.progress.suspend(|| {
            Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
        });
        match answer {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Could not read confirmation, treating as declined: {}", e);
                false
            }
        }
    }
}

/// Answers every question the same way, for headless runs and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedConfirmation {
    AlwaysConfirm,
    AlwaysDecline,
}

impl Confirmation for FixedConfirmation {
    fn confirm(&self, _prompt: &str) -> bool {
        matches!(self, Self::AlwaysConfirm)
    }
}

/// Outcome of consulting the marker store for a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryGate {
    /// No marker present
    Unmarked,
    /// Marker was present, confirmed and deleted
    MarkerRemoved(PathBuf),
    /// Marker confirmed during a dry run; left in place
    MarkerKept(PathBuf),
    /// Operator declined; the directory's files are not classified
    Skipped(PathBuf),
}

impl DirectoryGate {
    /// Whether files in the directory should be classified
    pub fn should_process(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// Outcome of applying a deletion directive to a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerWrite {
    Created,
    AlreadyPresent,
    /// Dry run; the marker would have been created
    Suppressed,
}

/// Location of the marker for `dir`
pub fn marker_path(dir: &Path) -> PathBuf {
    dir.join(MARKER_FILE_NAME)
}

/// Detects, creates and removes deletion markers
pub struct MarkerStore<C: Confirmation> {
    confirmation: C,
    dry_run: bool,
}

impl<C: Confirmation> MarkerStore<C> {
    /// Create a marker store that asks `confirmation` before removing markers
    pub fn new(confirmation: C, dry_run: bool) -> Self {
        Self {
            confirmation,
            dry_run,
        }
    }

    /// Resolve the gate for `dir` before any of its files are touched
    pub fn gate(&self, dir: &Path) -> Result<DirectoryGate> {
        let marker = marker_path(dir);
        if !marker.is_file() {
            return Ok(DirectoryGate::Unmarked);
        }

        let prompt = format!(
            "Directory {} is marked for deletion. Remove the marker and process it?",
            dir.display()
        );
        if !self.confirmation.confirm(&prompt) {
            info!("Skipping processing for directory {}", dir.display());
            return Ok(DirectoryGate::Skipped(marker));
        }

        if self.dry_run {
            info!("Dry run: would remove marker file: {}", marker.display());
            return Ok(DirectoryGate::MarkerKept(marker));
        }

        match fs::remove_file(&marker) {
            Ok(()) => {}
            // Removed by someone else between the check and now
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(FilizerError::Marker {
                    path: marker,
                    source,
                })
            }
        }
        info!("Removed marker file: {}", marker.display());
        Ok(DirectoryGate::MarkerRemoved(marker))
    }

    /// Place a marker in `dir`; a second call is a no-op
    pub fn create(&self, dir: &Path) -> Result<MarkerWrite> {
        let marker = marker_path(dir);

        if self.dry_run {
            if marker.is_file() {
                return Ok(MarkerWrite::AlreadyPresent);
            }
            info!("Dry run: would create marker file {}", marker.display());
            return Ok(MarkerWrite::Suppressed);
        }

        match OpenOptions::new().write(true).create_new(true).open(&marker) {
            Ok(_) => {
                info!("ACTION: Created marker file {}", marker.display());
                Ok(MarkerWrite::Created)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(MarkerWrite::AlreadyPresent),
            Err(source) => Err(FilizerError::Marker {
                path: marker,
                source,
            }),
        }
    }
}
