//! # Repository Module
//!
//! Sheet repository implementations for Ledgerbook.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The repository abstracts "rows in a sheet" behind a typed API.        │
//! │                                                                         │
//! │  WorkbookStore operation                                               │
//! │       │                                                                 │
//! │       │  doc.repository::<Product>()?.update("Widget", &product)       │
//! │       ▼                                                                 │
//! │  SheetRepository<Product>                                              │
//! │  ├── find_all()       linear scan, file order                          │
//! │  ├── find(key)        first exact match                                │
//! │  ├── add(&record)     append as last row                               │
//! │  ├── update(key, &r)  in-place full-row overwrite                      │
//! │  └── delete(key)      splice exactly one row                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<Vec<Cell>> (one sheet of the loaded document)                     │
//! │                                                                         │
//! │  The linear scan is a deliberate choice: data volumes are small and    │
//! │  the seam lets an indexed map replace it without changing callers.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Matching Policy
//! Exact, case-sensitive string equality on the key cell. No trimming, no
//! case folding - callers supply the exact stored key. With duplicate keys
//! already on disk, only the FIRST match is ever touched.
//!
//! ## Available Entity Modules
//!
//! - [`product`] - Product codec + stock delta application
//! - [`customer`] - Customer codec + GDPR anonymization
//! - [`sale`] - Sale line-item codec
//! - [`invoice`] - Invoice codec + Sales join
//! - [`movement`] - Inventory movement codec + sequence assignment

pub mod customer;
pub mod invoice;
pub mod movement;
pub mod product;
pub mod sale;

use std::marker::PhantomData;

use crate::codec::RowCodec;
use crate::document::Sheet;
use crate::error::{StoreError, StoreResult};

/// Typed CRUD over one sheet of a loaded document.
///
/// Lives only as long as the mutation session that produced it - the store
/// persists the whole document once after all repository calls finish.
pub struct SheetRepository<'doc, R: RowCodec> {
    sheet: &'doc mut Sheet,
    _record: PhantomData<R>,
}

impl<'doc, R: RowCodec> SheetRepository<'doc, R> {
    /// Creates a repository over a sheet. The caller (the document) has
    /// already resolved the sheet by `R::SHEET`.
    pub fn new(sheet: &'doc mut Sheet) -> Self {
        SheetRepository {
            sheet,
            _record: PhantomData,
        }
    }

    /// All decodable records, in file order. Single-pass, restartable,
    /// finite; header and blank-key rows are skipped.
    pub fn find_all(&self) -> Vec<R> {
        self.sheet
            .data_rows()
            .filter_map(|row| R::decode(row))
            .collect()
    }

    /// First record whose key cell equals `key` exactly.
    pub fn find(&self, key: &str) -> Option<R> {
        self.position_of(key)
            .and_then(|index| R::decode(&self.sheet.rows[index]))
    }

    /// Appends a record as the last row.
    ///
    /// For unique-key entities a duplicate key is rejected here, at the add
    /// boundary - pre-existing duplicates on disk stay tolerated with
    /// first-match semantics.
    pub fn add(&mut self, record: &R) -> StoreResult<()> {
        let key = record.key();
        if R::UNIQUE_KEY && self.position_of(&key).is_some() {
            return Err(StoreError::duplicate(R::ENTITY, key));
        }
        self.sheet.rows.push(record.encode());
        Ok(())
    }

    /// Overwrites all cell values (key included) of the first row matching
    /// `key`. Fails with `NotFound` after a full scan with no match.
    pub fn update(&mut self, key: &str, record: &R) -> StoreResult<()> {
        let index = self
            .position_of(key)
            .ok_or_else(|| StoreError::not_found(R::ENTITY, key))?;
        self.sheet.rows[index] = record.encode();
        Ok(())
    }

    /// Removes exactly the first row matching `key`, shifting subsequent
    /// rows up by one. Fails with `NotFound` when absent.
    pub fn delete(&mut self, key: &str) -> StoreResult<()> {
        let index = self
            .position_of(key)
            .ok_or_else(|| StoreError::not_found(R::ENTITY, key))?;
        self.sheet.rows.remove(index);
        Ok(())
    }

    /// Row index of the first key match. Top-to-bottom scan, header
    /// excluded; blank key cells never match (they're not records).
    fn position_of(&self, key: &str) -> Option<usize> {
        if key.is_empty() {
            return None;
        }
        self.sheet
            .rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| {
                row.get(R::KEY_COLUMN)
                    .is_some_and(|cell| !cell.is_blank() && cell.to_text() == key)
            })
            .map(|(index, _)| index)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RowCodec;
    use ledgerbook_core::Product;

    fn product(name: &str, quantity: f64) -> Product {
        Product {
            name: name.into(),
            quantity,
            buy_price: 5.0,
            sale_price: 9.0,
            reorder_level: 0.0,
            category: String::new(),
            sku: String::new(),
        }
    }

    fn product_sheet() -> Sheet {
        Sheet::with_headers(Product::SHEET, Product::HEADERS)
    }

    #[test]
    fn test_add_then_find_all_preserves_file_order() {
        let mut sheet = product_sheet();
        let mut repo = SheetRepository::<Product>::new(&mut sheet);

        repo.add(&product("Widget", 10.0)).unwrap();
        repo.add(&product("Gadget", 3.0)).unwrap();

        let all = repo.find_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Widget");
        assert_eq!(all[1].name, "Gadget");
    }

    #[test]
    fn test_add_rejects_duplicate_key() {
        let mut sheet = product_sheet();
        let mut repo = SheetRepository::<Product>::new(&mut sheet);

        repo.add(&product("Widget", 10.0)).unwrap();
        let err = repo.add(&product("Widget", 99.0)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        assert_eq!(repo.find_all().len(), 1);
    }

    #[test]
    fn test_update_overwrites_first_match_in_place() {
        let mut sheet = product_sheet();
        let mut repo = SheetRepository::<Product>::new(&mut sheet);

        repo.add(&product("Widget", 10.0)).unwrap();
        repo.add(&product("Gadget", 3.0)).unwrap();
        repo.update("Widget", &product("Widget", 7.0)).unwrap();

        let all = repo.find_all();
        assert_eq!(all[0].quantity, 7.0);
        // Row position unchanged
        assert_eq!(all[0].name, "Widget");
        assert_eq!(all[1].name, "Gadget");
    }

    #[test]
    fn test_key_matching_is_case_sensitive() {
        let mut sheet = product_sheet();
        let mut repo = SheetRepository::<Product>::new(&mut sheet);

        repo.add(&product("Widget", 10.0)).unwrap();
        assert!(repo.find("widget").is_none());
        assert!(matches!(
            repo.delete("WIDGET"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_splices_exactly_one_row() {
        let mut sheet = product_sheet();
        let mut repo = SheetRepository::<Product>::new(&mut sheet);

        repo.add(&product("A", 1.0)).unwrap();
        repo.add(&product("B", 2.0)).unwrap();
        repo.add(&product("C", 3.0)).unwrap();
        repo.delete("B").unwrap();

        let names: Vec<String> = repo.find_all().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_not_found_leaves_sheet_unmodified() {
        let mut sheet = product_sheet();
        let mut repo = SheetRepository::<Product>::new(&mut sheet);
        repo.add(&product("Widget", 10.0)).unwrap();

        assert!(repo.update("Ghost", &product("Ghost", 1.0)).is_err());
        assert!(repo.delete("Ghost").is_err());

        let all = repo.find_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], product("Widget", 10.0));
    }

    #[test]
    fn test_empty_key_never_matches() {
        let mut sheet = product_sheet();
        let repo = SheetRepository::<Product>::new(&mut sheet);
        assert!(repo.find("").is_none());
    }
}
