//! # Inventory Sheet
//!
//! Codec and sequence assignment for inventory movements.
//!
//! ## Sheet Layout
//! ```text
//! │ Date │ Product │ Sequence │ Type │ Quantity │ Reference │ Notes │ Balance After │
//! ```
//!
//! Movements are append-only history: `balance_after` is derived from the
//! product's balance at append time, and `sequence` is a per-(date, product)
//! counter that makes the composite identity (date, product, sequence)
//! unique even for several same-day movements of one product.

use ledgerbook_core::{InventoryMovement, MovementType};

use crate::codec::{blank_at, number_at, text_at, Cell, RowCodec};

impl RowCodec for InventoryMovement {
    const ENTITY: &'static str = "InventoryMovement";
    const SHEET: &'static str = "Inventory";
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Product",
        "Sequence",
        "Type",
        "Quantity",
        "Reference",
        "Notes",
        "Balance After",
    ];
    const KEY_COLUMN: usize = 1;
    // History rows repeat their product - no uniqueness at add
    const UNIQUE_KEY: bool = false;

    fn key(&self) -> String {
        self.product_name.clone()
    }

    fn decode(row: &[Cell]) -> Option<Self> {
        if blank_at(row, Self::KEY_COLUMN) {
            return None;
        }
        // A movement row with an unparseable type is corrupt history;
        // skip it rather than misclassify the quantity.
        let movement_type = MovementType::parse(&text_at(row, 3))?;
        Some(InventoryMovement {
            date: text_at(row, 0),
            product_name: text_at(row, 1),
            sequence: number_at(row, 2) as u32,
            movement_type,
            quantity: number_at(row, 4),
            reference: text_at(row, 5),
            notes: text_at(row, 6),
            balance_after: number_at(row, 7),
        })
    }

    fn encode(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.date.clone()),
            Cell::text(self.product_name.clone()),
            Cell::number(f64::from(self.sequence)),
            Cell::text(self.movement_type.as_str()),
            Cell::number(self.quantity),
            Cell::text(self.reference.clone()),
            Cell::text(self.notes.clone()),
            Cell::number(self.balance_after),
        ]
    }
}

/// Next sequence number for a (date, product) pair: one past the count of
/// matching movements already on the sheet.
pub fn next_sequence(movements: &[InventoryMovement], date: &str, product_name: &str) -> u32 {
    let existing = movements
        .iter()
        .filter(|m| m.date == date && m.product_name == product_name)
        .count() as u32;
    existing + 1
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(date: &str, product: &str, sequence: u32) -> InventoryMovement {
        InventoryMovement {
            date: date.into(),
            product_name: product.into(),
            sequence,
            movement_type: MovementType::Out,
            quantity: 3.0,
            reference: "SO-77".into(),
            notes: String::new(),
            balance_after: 7.0,
        }
    }

    #[test]
    fn test_codec_roundtrip() {
        let original = movement("2026-01-15", "Widget", 2);
        assert_eq!(
            InventoryMovement::decode(&original.encode()).unwrap(),
            original
        );
    }

    #[test]
    fn test_decode_skips_unparseable_type() {
        let mut row = movement("2026-01-15", "Widget", 1).encode();
        row[3] = Cell::text("TELEPORT");
        assert!(InventoryMovement::decode(&row).is_none());
    }

    #[test]
    fn test_next_sequence_counts_per_date_and_product() {
        let history = vec![
            movement("2026-01-15", "Widget", 1),
            movement("2026-01-15", "Widget", 2),
            movement("2026-01-15", "Gadget", 1),
            movement("2026-01-16", "Widget", 1),
        ];
        assert_eq!(next_sequence(&history, "2026-01-15", "Widget"), 3);
        assert_eq!(next_sequence(&history, "2026-01-15", "Gadget"), 2);
        assert_eq!(next_sequence(&history, "2026-01-16", "Widget"), 2);
        assert_eq!(next_sequence(&history, "2026-01-17", "Widget"), 1);
    }
}
