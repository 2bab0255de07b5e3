//! # Sales Sheet
//!
//! Codec for invoice line items.
//!
//! ## Sheet Layout
//! ```text
//! │ Invoice ID │ Product │ Date │ Quantity │ Unit Price │ Total │ Profit │
//! ```
//!
//! Sales rows are append-only: they are written by `save_invoice` with
//! totals frozen at save time, and never updated or deleted afterwards.
//! Many rows share one invoice id (one per line item), so the key column is
//! non-unique and exists for join/scan purposes only.

use ledgerbook_core::Sale;

use crate::codec::{blank_at, number_at, text_at, Cell, RowCodec};

impl RowCodec for Sale {
    const ENTITY: &'static str = "Sale";
    const SHEET: &'static str = "Sales";
    const HEADERS: &'static [&'static str] = &[
        "Invoice ID",
        "Product",
        "Date",
        "Quantity",
        "Unit Price",
        "Total",
        "Profit",
    ];
    const KEY_COLUMN: usize = 0;
    // Line items repeat their invoice id - no uniqueness at add
    const UNIQUE_KEY: bool = false;

    fn key(&self) -> String {
        self.invoice_id.clone()
    }

    fn decode(row: &[Cell]) -> Option<Self> {
        if blank_at(row, Self::KEY_COLUMN) {
            return None;
        }
        Some(Sale {
            invoice_id: text_at(row, 0),
            product_name: text_at(row, 1),
            date: text_at(row, 2),
            quantity: number_at(row, 3),
            unit_price: number_at(row, 4),
            total: number_at(row, 5),
            profit: number_at(row, 6),
        })
    }

    fn encode(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.invoice_id.clone()),
            Cell::text(self.product_name.clone()),
            Cell::text(self.date.clone()),
            Cell::number(self.quantity),
            Cell::number(self.unit_price),
            Cell::number(self.total),
            Cell::number(self.profit),
        ]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Sheet;
    use crate::repository::SheetRepository;

    fn line(invoice_id: &str, product: &str) -> Sale {
        Sale {
            invoice_id: invoice_id.into(),
            product_name: product.into(),
            date: "2026-01-15".into(),
            quantity: 3.0,
            unit_price: 9.0,
            total: 27.0,
            profit: 12.0,
        }
    }

    #[test]
    fn test_codec_roundtrip() {
        let sale = line("INV-001", "Widget");
        assert_eq!(Sale::decode(&sale.encode()).unwrap(), sale);
    }

    #[test]
    fn test_multiple_lines_share_one_invoice_id() {
        let mut sheet = Sheet::with_headers(Sale::SHEET, Sale::HEADERS);
        let mut repo = SheetRepository::<Sale>::new(&mut sheet);

        repo.add(&line("INV-001", "Widget")).unwrap();
        repo.add(&line("INV-001", "Gadget")).unwrap();

        let all = repo.find_all();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|s| s.invoice_id == "INV-001"));
    }
}
