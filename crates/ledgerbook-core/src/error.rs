//! # Error Types
//!
//! Domain-specific error types for ledgerbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ledgerbook-core errors (this file)                                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ledgerbook-store errors (separate crate)                              │
//! │  └── StoreError       - Workbook operation failures                    │
//! │                         (wraps ValidationError at the boundary)        │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError → presentation layer (verbatim)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field names, offending values)
//! 3. Errors are enum variants, never bare Strings

use thiserror::Error;

/// Input validation errors.
///
/// These occur when a typed operation payload doesn't meet requirements.
/// Validation runs at the boundary, before anything reaches the repository
/// layer, so a failed validation never touches the workbook file.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is not a finite number (NaN or infinity).
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Collection is empty where at least one element is required.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::Empty {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items must contain at least one entry");
    }
}
