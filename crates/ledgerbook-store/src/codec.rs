//! # Record Codec
//!
//! Maps typed records to/from fixed-column row representations.
//!
//! ## Codec Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Row ↔ Record Mapping                             │
//! │                                                                         │
//! │  decode(&[Cell]) -> Option<Record>                                     │
//! │  ├── Key cell empty/absent        → None (row skipped, never an error) │
//! │  ├── Numeric cell malformed       → coerced to 0.0                     │
//! │  ├── String cell absent           → coerced to ""                      │
//! │  └── Unknown trailing columns     → ignored                            │
//! │                                                                         │
//! │  encode(&Record) -> Vec<Cell>                                          │
//! │  └── ALWAYS the full fixed-length tuple in schema order                │
//! │      (no sparse/partial row writes)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The header row is handled positionally by the repository (row index 0 in
//! memory, row 1 on disk) - the codec itself only ever sees data rows.

use calamine::Data;

// =============================================================================
// Cell
// =============================================================================

/// One spreadsheet cell value, as the store models it in memory.
///
/// The on-disk format distinguishes many cell types (dates, booleans,
/// errors); the store collapses them all into text or number on read, which
/// is the entire vocabulary the schema uses.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    /// Text cell constructor.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Number cell constructor.
    pub fn number(value: f64) -> Self {
        Cell::Number(value)
    }

    /// Numeric coercion: non-numeric or missing values coerce to 0.0,
    /// never an error, never a null.
    pub fn to_number(&self) -> f64 {
        match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Cell::Empty => 0.0,
        }
    }

    /// String coercion: numbers render without a trailing `.0` when whole
    /// (a cell holding 3.0 reads back as "3"), missing values as "".
    pub fn to_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Cell::Empty => String::new(),
        }
    }

    /// True for cells that count as "no key": empty cells and empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
            // Serial date number; the schema stores dates as text, so a
            // genuine datetime cell only appears in hand-edited files.
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) | Data::Empty => Cell::Empty,
        }
    }
}

// =============================================================================
// Row Accessors
// =============================================================================

/// Text at a column index, coerced; "" when the row is short.
pub fn text_at(row: &[Cell], index: usize) -> String {
    row.get(index).map(Cell::to_text).unwrap_or_default()
}

/// Number at a column index, coerced; 0.0 when the row is short.
pub fn number_at(row: &[Cell], index: usize) -> f64 {
    row.get(index).map(Cell::to_number).unwrap_or(0.0)
}

/// Whether the cell at a column index is blank (missing rows are blank).
pub fn blank_at(row: &[Cell], index: usize) -> bool {
    row.get(index).map(Cell::is_blank).unwrap_or(true)
}

// =============================================================================
// RowCodec
// =============================================================================

/// A record type that lives in one named sheet as fixed-column rows.
///
/// Implementations sit next to their repositories in `repository/*`, one
/// per entity type, each defining its sheet name, header labels and key
/// column.
pub trait RowCodec: Sized {
    /// Entity label used in error messages ("Product", "Invoice", ...).
    const ENTITY: &'static str;

    /// Sheet this entity lives in.
    const SHEET: &'static str;

    /// Header labels, in column order. `encode` must produce exactly this
    /// many cells.
    const HEADERS: &'static [&'static str];

    /// 0-based column holding the natural key.
    const KEY_COLUMN: usize;

    /// Whether `add` enforces key uniqueness. Line-item and movement sheets
    /// legitimately repeat their key column (many Sales rows share one
    /// invoice id), so they opt out.
    const UNIQUE_KEY: bool = true;

    /// The record's natural key, matched by exact string equality.
    fn key(&self) -> String;

    /// Decodes one data row; `None` skips the row (blank key cell).
    fn decode(row: &[Cell]) -> Option<Self>;

    /// Encodes the full fixed-length column tuple in schema order.
    fn encode(&self) -> Vec<Cell>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Cell::Number(3.5).to_number(), 3.5);
        assert_eq!(Cell::text("42").to_number(), 42.0);
        assert_eq!(Cell::text(" 2.5 ").to_number(), 2.5);
        // Malformed and missing coerce to zero, never error
        assert_eq!(Cell::text("not a number").to_number(), 0.0);
        assert_eq!(Cell::Empty.to_number(), 0.0);
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(Cell::text("Widget").to_text(), "Widget");
        assert_eq!(Cell::Number(3.0).to_text(), "3");
        assert_eq!(Cell::Number(3.25).to_text(), "3.25");
        assert_eq!(Cell::Empty.to_text(), "");
    }

    #[test]
    fn test_blank_detection() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::text("").is_blank());
        assert!(!Cell::text("x").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn test_row_accessors_tolerate_short_rows() {
        let row = vec![Cell::text("Widget")];
        assert_eq!(text_at(&row, 0), "Widget");
        assert_eq!(text_at(&row, 5), "");
        assert_eq!(number_at(&row, 5), 0.0);
        assert!(blank_at(&row, 5));
    }

    #[test]
    fn test_calamine_conversion() {
        assert_eq!(Cell::from(&Data::String("x".into())), Cell::text("x"));
        assert_eq!(Cell::from(&Data::Float(1.5)), Cell::Number(1.5));
        assert_eq!(Cell::from(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(Cell::from(&Data::Bool(true)), Cell::Number(1.0));
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
    }
}
