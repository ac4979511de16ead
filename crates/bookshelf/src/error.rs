//! Error types for catalog loading and lookup.

use thiserror::Error;

/// Errors raised by the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No book with the given id.
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// Two records share the same id.
    #[error("Duplicate book id: {0}")]
    DuplicateId(String),

    /// A record failed validation.
    #[error("Invalid book record {id}: {reason}")]
    InvalidRecord {
        /// Id of the offending record.
        id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Catalog file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not valid JSON.
    #[error("Malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
