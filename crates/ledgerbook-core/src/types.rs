//! # Domain Types
//!
//! Core domain types used throughout Ledgerbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Invoice      │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (key)     │   │  invoice_id     │   │  (invoice_id,   │       │
//! │  │  quantity       │   │  customer_name  │   │   product_name) │       │
//! │  │  buy/sale price │   │  totals, status │   │  qty, total     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐                        │
//! │  │    Customer     │   │  InventoryMovement   │                        │
//! │  │  ─────────────  │   │  ──────────────────  │                        │
//! │  │  name (key)     │   │  (date, product,     │                        │
//! │  │  phone, email   │   │   sequence)          │                        │
//! │  │  address        │   │  type, balance_after │                        │
//! │  └─────────────────┘   └──────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Natural-Key Identity Pattern
//! Every record is identified by a natural key (product name, customer name,
//! invoice id) rather than a surrogate id. Keys are matched by exact,
//! case-sensitive string equality - no trimming or case folding.
//!
//! ## Why f64 for money and quantities?
//! The persistence substrate is a spreadsheet: every numeric cell is an IEEE
//! double. Using integer cents would make round-trips lossy against files
//! edited by spreadsheet applications, so all numeric fields stay `f64`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Product
// =============================================================================

/// A product tracked in the Products sheet.
///
/// `quantity` is the running stock balance: it is mutated by sale deductions
/// and by inventory movements, and must always equal the initial quantity
/// plus the signed sum of all movements applied in sheet order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Natural key - unique within the Products sheet.
    pub name: String,

    /// Current stock balance.
    pub quantity: f64,

    /// Purchase price per unit (used for profit calculations).
    pub buy_price: f64,

    /// Sale price per unit.
    pub sale_price: f64,

    /// Stock level below which the product should be reordered.
    /// Zero when unset.
    pub reorder_level: f64,

    /// Free-form category label. Empty when unset.
    pub category: String,

    /// Stock keeping unit. Empty when unset.
    pub sku: String,
}

impl Product {
    /// Checks whether the product is at or below its reorder level.
    ///
    /// A reorder level of zero means "never reorder" and always returns false.
    pub fn needs_reorder(&self) -> bool {
        self.reorder_level > 0.0 && self.quantity <= self.reorder_level
    }

    /// Profit earned per unit at the current sale price.
    #[inline]
    pub fn unit_margin(&self) -> f64 {
        self.sale_price - self.buy_price
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer tracked in the Customers sheet.
///
/// Customers are never physically deleted once referenced by an invoice:
/// GDPR removal anonymizes the contact fields in place, preserving the name
/// so historical Invoices/Sales keep resolving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Natural key - unique within the Customers sheet.
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

// =============================================================================
// Sale (invoice line item)
// =============================================================================

/// A single invoice line item, stored as one row in the Sales sheet.
///
/// Identified by the composite (invoice_id, product_name). `total` and
/// `profit` are computed at save time and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub invoice_id: String,
    pub product_name: String,
    /// Sale date, stamped from the owning invoice.
    pub date: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// quantity × unit_price, frozen at save time.
    pub total: f64,
    /// quantity × (unit_price − buy_price), frozen at save time.
    pub profit: f64,
}

// =============================================================================
// Invoice Status
// =============================================================================

/// The lifecycle status of an invoice.
///
/// Status is the only invoice field that may change after save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Issued, payment outstanding.
    Pending,
    /// Paid in full.
    Paid,
    /// Cancelled after issue.
    Cancelled,
}

impl InvoiceStatus {
    /// The string stored in the Status cell.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Cancelled => "Cancelled",
        }
    }

    /// Lenient parse of an on-disk status cell.
    ///
    /// Unknown or missing values decode to `Pending` - the read side never
    /// rejects a row over a malformed status.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => InvoiceStatus::Paid,
            "cancelled" | "canceled" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Pending,
        }
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice, stored as one row in the Invoices sheet.
///
/// ## Join Semantics
/// `items` is never stored nested on disk. The Invoices row carries only the
/// header fields; line items live in the Sales sheet and are resolved by a
/// join on `invoice_id` at read time.
///
/// ## Invariant
/// `total_amount == Σ items.total` and `total_profit == Σ items.profit` at
/// save time. Line items cannot be edited post-save, so no drift is possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Natural key - unique within the Invoices sheet.
    pub invoice_id: String,
    pub date: String,
    pub customer_name: String,
    pub total_amount: f64,
    pub total_profit: f64,
    pub status: InvoiceStatus,
    /// Joined from the Sales sheet; empty until resolved.
    #[serde(default)]
    pub items: Vec<Sale>,
}

// =============================================================================
// Inventory Movement
// =============================================================================

/// The kind of an inventory movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// Stock received: balance increases by `quantity`.
    In,
    /// Stock dispatched: balance decreases by `quantity`.
    Out,
    /// Stock count correction: `quantity` is the target balance, and the
    /// recorded delta is `target − current`.
    Adjustment,
}

impl MovementType {
    /// The string stored in the Type cell.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "IN",
            MovementType::Out => "OUT",
            MovementType::Adjustment => "ADJUSTMENT",
        }
    }

    /// Strict parse of a movement type string.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IN" => Some(MovementType::In),
            "OUT" => Some(MovementType::Out),
            "ADJUSTMENT" => Some(MovementType::Adjustment),
            _ => None,
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the Inventory sheet: a single stock movement.
///
/// Identified by the composite (date, product_name, sequence), where
/// `sequence` is assigned at append time. `balance_after` is derived from the
/// prior balance and the movement delta - never user-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub date: String,
    pub product_name: String,
    /// Per-(date, product) counter disambiguating same-day movements.
    pub sequence: u32,
    pub movement_type: MovementType,
    /// For IN/OUT: the moved amount. For ADJUSTMENT: the target balance.
    pub quantity: f64,
    /// External reference (PO number, invoice id, ...). Empty when unset.
    pub reference: String,
    pub notes: String,
    /// Running product balance after this movement was applied.
    pub balance_after: f64,
}

// =============================================================================
// Composite Operation Drafts
// =============================================================================
// Typed request payloads for the composite operations. These replace the
// dynamic any-typed IPC payloads of older trackers: the boundary validates a
// draft before anything reaches the repository layer.

/// One requested line item inside an [`InvoiceDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDraft {
    /// Must name an existing product.
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Request payload for the `save_invoice` composite operation.
///
/// Totals are NOT part of the draft: they are computed from the lines at save
/// time, which is what makes the invoice-consistency invariant hold by
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub invoice_id: String,
    pub date: String,
    pub customer_name: String,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub items: Vec<LineDraft>,
}

/// Request payload for the `add_inventory_movement` composite operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementDraft {
    pub date: String,
    /// Must name an existing product.
    pub product_name: String,
    pub movement_type: MovementType,
    /// For IN/OUT: the moved amount. For ADJUSTMENT: the target balance.
    pub quantity: f64,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_status_roundtrip() {
        for status in [
            InvoiceStatus::Pending,
            InvoiceStatus::Paid,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(InvoiceStatus::parse_lenient(status.as_str()), status);
        }
    }

    #[test]
    fn test_invoice_status_lenient_parse() {
        assert_eq!(InvoiceStatus::parse_lenient("PAID"), InvoiceStatus::Paid);
        assert_eq!(
            InvoiceStatus::parse_lenient("canceled"),
            InvoiceStatus::Cancelled
        );
        // Unknown and empty values fall back to Pending
        assert_eq!(InvoiceStatus::parse_lenient(""), InvoiceStatus::Pending);
        assert_eq!(InvoiceStatus::parse_lenient("huh"), InvoiceStatus::Pending);
    }

    #[test]
    fn test_movement_type_parse() {
        assert_eq!(MovementType::parse("IN"), Some(MovementType::In));
        assert_eq!(MovementType::parse(" out "), Some(MovementType::Out));
        assert_eq!(
            MovementType::parse("adjustment"),
            Some(MovementType::Adjustment)
        );
        assert_eq!(MovementType::parse("TRANSFER"), None);
    }

    #[test]
    fn test_needs_reorder() {
        let mut product = Product {
            name: "Widget".into(),
            quantity: 3.0,
            buy_price: 5.0,
            sale_price: 9.0,
            reorder_level: 5.0,
            category: String::new(),
            sku: String::new(),
        };
        assert!(product.needs_reorder());

        product.quantity = 10.0;
        assert!(!product.needs_reorder());

        // Zero reorder level means "never reorder"
        product.quantity = 0.0;
        product.reorder_level = 0.0;
        assert!(!product.needs_reorder());
    }

    #[test]
    fn test_invoice_draft_deserializes_without_status() {
        let json = r#"{
            "invoiceId": "INV-001",
            "date": "2026-01-15",
            "customerName": "Acme",
            "items": [{"productName": "Widget", "quantity": 2, "unitPrice": 9}]
        }"#;
        let draft: InvoiceDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.status, InvoiceStatus::Pending);
        assert_eq!(draft.items.len(), 1);
    }
}
