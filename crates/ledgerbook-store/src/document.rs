//! # Workbook Document
//!
//! The in-memory document graph: a set of named sheets, each a grid of
//! cells, plus (de)serialization to/from xlsx bytes.
//!
//! ## Document Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Per Save Cycle                                    │
//! │                                                                         │
//! │  Unloaded ──ensure()──► Ensuring ──load()──► Loaded                    │
//! │                                                │                        │
//! │                                 repository mutations                    │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                             Mutated                     │
//! │                                                │                        │
//! │                            to_xlsx_bytes + PersistenceGuard             │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                  Persisting ──► Loaded                  │
//! │                                                                         │
//! │  The whole document serializes in ONE call at the end of a mutation     │
//! │  session - an error anywhere before that leaves the file untouched.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cells are addressed by fixed column position, never by header-name lookup:
//! row 1 on disk is always the bold header row, data starts at row 2.

use calamine::{Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use std::io::Cursor;

use ledgerbook_core::{Customer, InventoryMovement, Invoice, Product, Sale};

use crate::codec::{Cell, RowCodec};
use crate::error::{StoreError, StoreResult};
use crate::repository::SheetRepository;

// =============================================================================
// Sheet
// =============================================================================

/// One named sheet: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// `rows[0]` is the header row; data rows follow in file order.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates an empty sheet with the given header labels.
    pub fn with_headers(name: &str, headers: &[&str]) -> Self {
        Sheet {
            name: name.to_string(),
            rows: vec![headers.iter().map(|h| Cell::text(*h)).collect()],
        }
    }

    /// Data rows in file order (header skipped positionally).
    pub fn data_rows(&self) -> impl Iterator<Item = &Vec<Cell>> {
        self.rows.iter().skip(1)
    }

    /// Number of data rows (excluding the header).
    pub fn row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

// =============================================================================
// WorkbookDocument
// =============================================================================

/// The full in-memory document: every sheet of the backing workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookDocument {
    sheets: Vec<Sheet>,
}

impl WorkbookDocument {
    /// Synthesizes a fresh document with one sheet per entity type, each
    /// holding only its header row. This is what `ensure()` persists when
    /// the backing file does not exist yet.
    pub fn with_default_schema() -> Self {
        WorkbookDocument {
            sheets: vec![
                Sheet::with_headers(Product::SHEET, Product::HEADERS),
                Sheet::with_headers(Customer::SHEET, Customer::HEADERS),
                Sheet::with_headers(Sale::SHEET, Sale::HEADERS),
                Sheet::with_headers(Invoice::SHEET, Invoice::HEADERS),
                Sheet::with_headers(InventoryMovement::SHEET, InventoryMovement::HEADERS),
            ],
        }
    }

    /// Wraps a single sheet in a standalone document (sheet export).
    pub fn from_single_sheet(sheet: Sheet) -> Self {
        WorkbookDocument {
            sheets: vec![sheet],
        }
    }

    /// All sheet names, in file order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Lenient sheet lookup - `None` for a missing sheet. Read paths use
    /// this and treat `None` as an empty result set.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Strict mutable sheet lookup - write paths fail with `SheetNotFound`.
    pub fn sheet_mut(&mut self, name: &str) -> StoreResult<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| StoreError::sheet_not_found(name))
    }

    /// Decodes every row of an entity's sheet, skipping the header and any
    /// row the codec rejects. A missing sheet yields an empty vec - the
    /// read side is deliberately soft-fail.
    pub fn decode_all<R: RowCodec>(&self) -> Vec<R> {
        match self.sheet(R::SHEET) {
            Some(sheet) => sheet.data_rows().filter_map(|row| R::decode(row)).collect(),
            None => Vec::new(),
        }
    }

    /// A typed repository over an entity's sheet. Strict: missing sheet is
    /// an error, because every repository caller is about to write.
    pub fn repository<R: RowCodec>(&mut self) -> StoreResult<SheetRepository<'_, R>> {
        Ok(SheetRepository::new(self.sheet_mut(R::SHEET)?))
    }

    // =========================================================================
    // xlsx (de)serialization
    // =========================================================================

    /// Parses xlsx bytes into a document.
    ///
    /// Every sheet is read cell-by-cell into the `Cell` model; cell types
    /// outside the schema's text/number vocabulary are collapsed by the
    /// codec's conversion rules.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> StoreResult<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
        let names = workbook.sheet_names().to_owned();

        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = workbook.worksheet_range(&name)?;
            let rows: Vec<Vec<Cell>> = range
                .rows()
                .map(|row| row.iter().map(Cell::from).collect())
                .collect();
            sheets.push(Sheet { name, rows });
        }

        Ok(WorkbookDocument { sheets })
    }

    /// Serializes the whole document to xlsx bytes.
    ///
    /// Row 1 of every sheet is written with bold styling; everything else is
    /// written plain, text cells as strings and numeric cells as numbers.
    /// Serialization happens entirely in memory - a failure here never
    /// touches the canonical file.
    pub fn to_xlsx_bytes(&self) -> StoreResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;

            for (row_index, row) in sheet.rows.iter().enumerate() {
                for (col_index, cell) in row.iter().enumerate() {
                    let row_number = row_index as u32;
                    let col_number = col_index as u16;
                    match cell {
                        Cell::Text(text) if row_index == 0 => {
                            worksheet.write_string_with_format(
                                row_number, col_number, text, &bold,
                            )?;
                        }
                        Cell::Text(text) => {
                            worksheet.write_string(row_number, col_number, text)?;
                        }
                        Cell::Number(value) => {
                            worksheet.write_number(row_number, col_number, *value)?;
                        }
                        Cell::Empty => {}
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_has_all_five_sheets() {
        let doc = WorkbookDocument::with_default_schema();
        assert_eq!(
            doc.sheet_names(),
            vec!["Products", "Customers", "Sales", "Invoices", "Inventory"]
        );
        // Header-only: no data rows anywhere
        for name in doc.sheet_names() {
            assert_eq!(doc.sheet(name).unwrap().row_count(), 0);
        }
    }

    #[test]
    fn test_missing_sheet_is_lenient_on_read_strict_on_write() {
        let mut doc = WorkbookDocument::from_single_sheet(Sheet::with_headers(
            Product::SHEET,
            Product::HEADERS,
        ));

        // Read side: missing Customers sheet decodes to an empty set
        assert!(doc.decode_all::<Customer>().is_empty());

        // Write side: missing sheet is an error
        assert!(matches!(
            doc.repository::<Customer>(),
            Err(StoreError::SheetNotFound { .. })
        ));
    }

    #[test]
    fn test_xlsx_roundtrip_preserves_cells() {
        let mut doc = WorkbookDocument::with_default_schema();
        doc.sheet_mut(Product::SHEET).unwrap().rows.push(vec![
            Cell::text("Widget"),
            Cell::Number(10.0),
            Cell::Number(5.0),
            Cell::Number(9.0),
            Cell::Number(2.0),
            Cell::text("Hardware"),
            Cell::text("WID-1"),
        ]);

        let bytes = doc.to_xlsx_bytes().unwrap();
        let reloaded = WorkbookDocument::from_xlsx_bytes(&bytes).unwrap();

        let sheet = reloaded.sheet(Product::SHEET).unwrap();
        assert_eq!(sheet.row_count(), 1);
        let row = sheet.data_rows().next().unwrap();
        assert_eq!(row[0], Cell::text("Widget"));
        assert_eq!(row[1], Cell::Number(10.0));
        assert_eq!(row[6], Cell::text("WID-1"));
    }
}
