//! # Validation Module
//!
//! Boundary validation for typed operation payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Shape and type checks on the tagged payload                       │
//! │  └── Rejects structurally invalid requests                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, ranges, finiteness                               │
//! │  └── Runs before any workbook access                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Repository (ledgerbook-store)                                │
//! │  ├── Key uniqueness at the add boundary                                │
//! │  └── Referential checks (products referenced by lines exist)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note that key matching in the store is exact and case-sensitive, so the
//! validators here deliberately do NOT trim or normalize key fields - a
//! caller-supplied key must pass through unchanged.

use crate::error::ValidationError;
use crate::types::{Customer, InvoiceDraft, MovementDraft, MovementType, Product};
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a natural key (product name, customer name, invoice id).
///
/// ## Rules
/// - Must not be empty or whitespace-only
/// - Must be at most [`MAX_NAME_LENGTH`] characters
pub fn validate_key(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Validates a numeric field that must be finite and non-negative.
pub fn validate_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a numeric field that must be finite and strictly positive.
pub fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a product before add/update.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_key("name", &product.name)?;
    validate_non_negative("quantity", product.quantity)?;
    validate_non_negative("buyPrice", product.buy_price)?;
    validate_non_negative("salePrice", product.sale_price)?;
    validate_non_negative("reorderLevel", product.reorder_level)?;
    Ok(())
}

/// Validates a customer before add/update.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    validate_key("name", &customer.name)
}

/// Validates an invoice draft before the `save_invoice` composite runs.
///
/// Referential checks (do the named products exist?) belong to the store,
/// which has the loaded document in hand.
pub fn validate_invoice_draft(draft: &InvoiceDraft) -> ValidationResult<()> {
    validate_key("invoiceId", &draft.invoice_id)?;
    validate_key("customerName", &draft.customer_name)?;
    if draft.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }
    for item in &draft.items {
        validate_key("productName", &item.product_name)?;
        validate_positive("quantity", item.quantity)?;
        validate_non_negative("unitPrice", item.unit_price)?;
    }
    Ok(())
}

/// Validates a movement draft before the `add_inventory_movement` composite.
///
/// IN/OUT quantities must be strictly positive; an ADJUSTMENT target may be
/// zero (adjusting a product down to nothing is legitimate).
pub fn validate_movement_draft(draft: &MovementDraft) -> ValidationResult<()> {
    validate_key("productName", &draft.product_name)?;
    validate_key("date", &draft.date)?;
    match draft.movement_type {
        MovementType::In | MovementType::Out => validate_positive("quantity", draft.quantity),
        MovementType::Adjustment => validate_non_negative("quantity", draft.quantity),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineDraft;

    fn widget() -> Product {
        Product {
            name: "Widget".into(),
            quantity: 10.0,
            buy_price: 5.0,
            sale_price: 9.0,
            reorder_level: 0.0,
            category: String::new(),
            sku: String::new(),
        }
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&widget()).is_ok());

        let mut bad = widget();
        bad.name = "   ".into();
        assert!(matches!(
            validate_product(&bad),
            Err(ValidationError::Required { .. })
        ));

        let mut bad = widget();
        bad.buy_price = -1.0;
        assert!(matches!(
            validate_product(&bad),
            Err(ValidationError::MustNotBeNegative { .. })
        ));

        let mut bad = widget();
        bad.quantity = f64::NAN;
        assert!(matches!(
            validate_product(&bad),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_invoice_draft_requires_items() {
        let draft = InvoiceDraft {
            invoice_id: "INV-001".into(),
            date: "2026-01-15".into(),
            customer_name: "Acme".into(),
            status: Default::default(),
            items: vec![],
        };
        assert!(matches!(
            validate_invoice_draft(&draft),
            Err(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn test_validate_invoice_draft_rejects_zero_quantity_line() {
        let draft = InvoiceDraft {
            invoice_id: "INV-001".into(),
            date: "2026-01-15".into(),
            customer_name: "Acme".into(),
            status: Default::default(),
            items: vec![LineDraft {
                product_name: "Widget".into(),
                quantity: 0.0,
                unit_price: 9.0,
            }],
        };
        assert!(matches!(
            validate_invoice_draft(&draft),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_adjustment_to_zero_is_allowed() {
        let draft = MovementDraft {
            date: "2026-01-15".into(),
            product_name: "Widget".into(),
            movement_type: MovementType::Adjustment,
            quantity: 0.0,
            reference: String::new(),
            notes: String::new(),
        };
        assert!(validate_movement_draft(&draft).is_ok());

        let out = MovementDraft {
            movement_type: MovementType::Out,
            ..draft
        };
        assert!(matches!(
            validate_movement_draft(&out),
            Err(ValidationError::MustBePositive { .. })
        ));
    }
}
