//! # ledgerbook-core: Pure Business Logic for Ledgerbook
//!
//! This crate is the **heart** of Ledgerbook. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ledgerbook Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (out of scope)               │   │
//! │  │     Product UI ──► Invoice UI ──► Inventory UI ──► Reports      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed operations                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ ledgerbook-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐                 │   │
//! │  │   │   types   │  │  balance  │  │ validation │                 │   │
//! │  │   │  Product  │  │  deltas   │  │   rules    │                 │   │
//! │  │   │  Invoice  │  │  totals   │  │   checks   │                 │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILE ACCESS • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ledgerbook-store (Workbook Layer)                 │   │
//! │  │        codec, repositories, persistence guard, cache            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, Customer, Sale, Invoice, movements)
//! - [`balance`] - Derived-balance deltas and invoice totals
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation for operation payloads
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Workbook, network, file system access is FORBIDDEN here
//! 3. **Spreadsheet Numerics**: All numbers are `f64` because the backing
//!    store is a spreadsheet whose cells are IEEE doubles
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod balance;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use ledgerbook_core::Product` instead of
// `use ledgerbook_core::types::Product`.

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a natural key (product name, customer name, invoice id).
///
/// ## Business Reason
/// Keys end up as spreadsheet cell values and as display labels; unbounded
/// keys break both. Generous enough for real product/customer names.
pub const MAX_NAME_LENGTH: usize = 200;
