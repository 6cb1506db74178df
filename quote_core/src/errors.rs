//! # Error Types
//!
//! Structured error types for quote_core. The pricing and material functions
//! themselves are total and never fail; these errors cover the operations that
//! can legitimately be refused: catalog lookups by id, attaching a category to
//! an item with no area, and draft file I/O.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{QuoteError, QuoteResult};
//!
//! fn validate_area(area_sqft: f64) -> QuoteResult<()> {
//!     if area_sqft <= 0.0 {
//!         return Err(QuoteError::invalid_input(
//!             "area",
//!             area_sqft.to_string(),
//!             "Area must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for quote_core operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Structured error type for quote operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Catalog entry (category, subcategory, tile size, add-on) not found
    #[error("Catalog entry not found: {kind} '{id}'")]
    CatalogNotFound { kind: String, id: String },

    /// Line item not found in the draft
    #[error("Line item not found: {id}")]
    ItemNotFound { id: String },

    /// Add-on not found on its line item
    #[error("Add-on not found: {id}")]
    AddonNotFound { id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl QuoteError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a CatalogNotFound error
    pub fn catalog_not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        QuoteError::CatalogNotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create an ItemNotFound error
    pub fn item_not_found(id: impl ToString) -> Self {
        QuoteError::ItemNotFound { id: id.to_string() }
    }

    /// Create an AddonNotFound error
    pub fn addon_not_found(id: impl ToString) -> Self {
        QuoteError::AddonNotFound { id: id.to_string() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        QuoteError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QuoteError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::InvalidInput { .. } => "INVALID_INPUT",
            QuoteError::CatalogNotFound { .. } => "CATALOG_NOT_FOUND",
            QuoteError::ItemNotFound { .. } => "ITEM_NOT_FOUND",
            QuoteError::AddonNotFound { .. } => "ADDON_NOT_FOUND",
            QuoteError::FileError { .. } => "FILE_ERROR",
            QuoteError::FileLocked { .. } => "FILE_LOCKED",
            QuoteError::SerializationError { .. } => "SERIALIZATION_ERROR",
            QuoteError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(e: serde_json::Error) -> Self {
        QuoteError::SerializationError {
            reason: e.to_string(),
        }
    }
}
