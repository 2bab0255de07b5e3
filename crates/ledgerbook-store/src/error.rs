//! # Store Error Types
//!
//! Error types for workbook operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Library error (std::io, calamine, rust_xlsxwriter)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Presentation layer surfaces Display text verbatim and leaves          │
//! │  its in-memory state unchanged (no optimistic mutation)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read/Write Asymmetry
//! Reads soft-fail: a missing sheet yields an empty result set, never an
//! error. Writes are strict: a missing sheet is `SheetNotFound`, a missing
//! key is `NotFound`. Nothing here retries - a failed write is reported once
//! and the caller decides.

use std::path::PathBuf;

use thiserror::Error;

/// Workbook operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Update/delete target key absent from its sheet.
    ///
    /// ## When This Occurs
    /// - `update`/`delete` scanned the full sheet without a key match
    /// - A composite operation referenced a product/invoice that isn't there
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Expected named sheet missing from an otherwise-loaded document.
    ///
    /// ## When This Occurs
    /// - Schema corruption, or a pre-migration file written by an older tool
    /// - Should not normally occur: `ensure()` synthesizes the default schema
    #[error("Sheet not found in workbook: {sheet}")]
    SheetNotFound { sheet: String },

    /// `add` would introduce a second row with the same natural key.
    ///
    /// Uniqueness is enforced at the add boundary; duplicate keys already on
    /// disk are tolerated with first-match semantics.
    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: &'static str, key: String },

    /// File system read/write/copy failure.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The atomic-replace rename step failed.
    ///
    /// The canonical file is unmodified and a valid temp file remains at
    /// `temp`; recovery requires operator intervention. Never auto-retried.
    #[error("failed to replace workbook with {temp}: {source}")]
    ReplaceFailed {
        temp: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed on-disk document, or a write-side encoding failure.
    #[error("Serialization failure: {0}")]
    Serialization(String),

    /// A typed operation payload failed boundary validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ledgerbook_core::ValidationError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and key.
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Creates a DuplicateKey error.
    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        StoreError::DuplicateKey {
            entity,
            key: key.into(),
        }
    }

    /// Creates a SheetNotFound error.
    pub fn sheet_not_found(sheet: impl Into<String>) -> Self {
        StoreError::SheetNotFound {
            sheet: sheet.into(),
        }
    }
}

/// Read-side parse failures become SerializationFailure: the document on
/// disk could not be understood as a workbook.
impl From<calamine::XlsxError> for StoreError {
    fn from(err: calamine::XlsxError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Write-side encoding failures become SerializationFailure: the in-memory
/// document could not be rendered to xlsx bytes.
impl From<rust_xlsxwriter::XlsxError> for StoreError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for workbook operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("Product", "Widget");
        assert_eq!(err.to_string(), "Product not found: Widget");

        let err = StoreError::duplicate("Customer", "Acme");
        assert_eq!(err.to_string(), "Customer 'Acme' already exists");

        let err = StoreError::sheet_not_found("Products");
        assert_eq!(err.to_string(), "Sheet not found in workbook: Products");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: StoreError = ledgerbook_core::ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: name is required");
    }
}
