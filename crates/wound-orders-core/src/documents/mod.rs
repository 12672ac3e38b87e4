//! Order documents: invoice generation, storage and email delivery.

mod delivery;
mod invoice;

pub use delivery::*;
pub use invoice::*;

use thiserror::Error;

use crate::db::DbError;

/// Document generation and delivery errors.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Document not found: {0}")]
    NotFound(String),
}

impl<T> From<std::sync::PoisonError<T>> for DocumentError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DocumentError::Storage(format!("Lock poisoned: {}", e))
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;
