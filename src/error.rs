//! Global error handling for filizer
//!
//! This module provides a centralized error type covering the three
//! failure classes a run can meet: local I/O, remote inventory calls, and
//! configuration problems detected at startup.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::inventory::InventoryError;

/// Global error type for filizer operations
#[derive(Error, Debug)]
pub enum FilizerError {
    /// File system errors (unreadable or vanished file)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Remote inventory errors (query or create call failed)
    #[error("Network error: {0}")]
    Network(#[from] InventoryError),

    /// Configuration errors, fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Marker file could not be created or removed
    #[error("Marker error at {path}: {source}")]
    Marker {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FilizerError {
    /// Whether this error must stop the process before any traversal
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Specialized Result type for filizer operations
pub type Result<T> = std::result::Result<T, FilizerError>;

/// Creates a FilizerError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::FilizerError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(value: u64) -> Result<u64> {
        ensure!(value > 0, Config, "value must be positive, got {}", value);
        Ok(value)
    }

    #[test]
    fn test_ensure_builds_config_error() {
        let err = check_positive(0).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Configuration error: value must be positive, got 0"
        );
        assert_eq!(check_positive(3).unwrap(), 3);
    }

    #[test]
    fn test_per_file_errors_are_not_fatal() {
        let io_err = FilizerError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(!io_err.is_fatal());

        let net_err = FilizerError::from(InventoryError::Status {
            status: 500,
            body: "boom".to_string(),
        });
        assert!(!net_err.is_fatal());
        assert!(net_err.to_string().starts_with("Network error:"));
    }
}
