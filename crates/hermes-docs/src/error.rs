//! Error types for the documentation crate.

use thiserror::Error;

/// Errors that can occur while rendering documentation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the document to JSON.
    #[error("failed to serialize API document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
