//! # Product Sheet
//!
//! Codec and stock helpers for the Products sheet.
//!
//! ## Sheet Layout
//! ```text
//! │ Name │ Quantity │ Buy Price │ Sale Price │ Reorder Level │ Category │ SKU │
//! │ (key)│ (derived)│           │            │   optional    │ optional │ opt │
//! ```
//!
//! `Quantity` is the running stock balance - sale deductions and inventory
//! movements both flow through [`apply_stock_delta`] so the Products sheet
//! and the Inventory sheet can never disagree within one mutation session.

use ledgerbook_core::Product;

use crate::codec::{blank_at, number_at, text_at, Cell, RowCodec};
use crate::error::StoreResult;
use crate::repository::SheetRepository;

impl RowCodec for Product {
    const ENTITY: &'static str = "Product";
    const SHEET: &'static str = "Products";
    const HEADERS: &'static [&'static str] = &[
        "Name",
        "Quantity",
        "Buy Price",
        "Sale Price",
        "Reorder Level",
        "Category",
        "SKU",
    ];
    const KEY_COLUMN: usize = 0;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn decode(row: &[Cell]) -> Option<Self> {
        if blank_at(row, Self::KEY_COLUMN) {
            return None;
        }
        Some(Product {
            name: text_at(row, 0),
            quantity: number_at(row, 1),
            buy_price: number_at(row, 2),
            sale_price: number_at(row, 3),
            reorder_level: number_at(row, 4),
            category: text_at(row, 5),
            sku: text_at(row, 6),
        })
    }

    fn encode(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.name.clone()),
            Cell::number(self.quantity),
            Cell::number(self.buy_price),
            Cell::number(self.sale_price),
            Cell::number(self.reorder_level),
            Cell::text(self.category.clone()),
            Cell::text(self.sku.clone()),
        ]
    }
}

/// Applies a signed stock delta to a product's quantity in place.
///
/// Returns the new balance. Fails with `NotFound` when the product is
/// absent; the balance may legitimately go negative (the store does not
/// block oversells - the reorder level exists to surface them).
pub fn apply_stock_delta(
    repo: &mut SheetRepository<'_, Product>,
    name: &str,
    delta: f64,
) -> StoreResult<f64> {
    let mut product = repo
        .find(name)
        .ok_or_else(|| crate::error::StoreError::not_found(Product::ENTITY, name))?;
    product.quantity += delta;
    let new_balance = product.quantity;
    repo.update(name, &product)?;
    Ok(new_balance)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Sheet;

    fn widget() -> Product {
        Product {
            name: "Widget".into(),
            quantity: 10.0,
            buy_price: 5.0,
            sale_price: 9.0,
            reorder_level: 2.0,
            category: "Hardware".into(),
            sku: "WID-1".into(),
        }
    }

    #[test]
    fn test_codec_roundtrip() {
        let product = widget();
        let decoded = Product::decode(&product.encode()).unwrap();
        assert_eq!(decoded, product);
    }

    #[test]
    fn test_decode_skips_blank_key() {
        assert!(Product::decode(&[Cell::Empty, Cell::Number(10.0)]).is_none());
        assert!(Product::decode(&[Cell::text(""), Cell::Number(10.0)]).is_none());
    }

    #[test]
    fn test_decode_coerces_malformed_numerics_to_zero() {
        let row = vec![
            Cell::text("Widget"),
            Cell::text("lots"),
            Cell::Empty,
            Cell::Number(9.0),
        ];
        let product = Product::decode(&row).unwrap();
        assert_eq!(product.quantity, 0.0);
        assert_eq!(product.buy_price, 0.0);
        assert_eq!(product.sale_price, 9.0);
        // Short row: trailing optional columns coerce to empty
        assert_eq!(product.category, "");
        assert_eq!(product.sku, "");
    }

    #[test]
    fn test_apply_stock_delta() {
        let mut sheet = Sheet::with_headers(Product::SHEET, Product::HEADERS);
        let mut repo = SheetRepository::<Product>::new(&mut sheet);
        repo.add(&widget()).unwrap();

        assert_eq!(apply_stock_delta(&mut repo, "Widget", -3.0).unwrap(), 7.0);
        assert_eq!(apply_stock_delta(&mut repo, "Widget", 13.0).unwrap(), 20.0);
        assert_eq!(repo.find("Widget").unwrap().quantity, 20.0);

        assert!(apply_stock_delta(&mut repo, "Ghost", 1.0).is_err());
    }
}
