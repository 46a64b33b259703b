//! Error types for the inventory client

use thiserror::Error;

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Errors that can occur while talking to the remote inventory
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Connection refused, DNS failure, timeout
    #[error("Request error: {0}")]
    RequestError(String),

    /// Server answered with a non-success status
    #[error("Inventory returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Endpoint could not be derived from the configured URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<reqwest::Error> for InventoryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            InventoryError::MalformedResponse(error.to_string())
        } else {
            InventoryError::RequestError(error.to_string())
        }
    }
}

impl From<url::ParseError> for InventoryError {
    fn from(error: url::ParseError) -> Self {
        InventoryError::InvalidEndpoint(error.to_string())
    }
}
