//! # ledgerbook-store: Workbook Data Layer for Ledgerbook
//!
//! Everything that touches the workbook file lives here: the cell codec,
//! the in-memory document, typed sheet repositories, the persistence guard
//! and the root [`WorkbookStore`] handle.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ledgerbook Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      ledgerbook-core                            │   │
//! │  │           types • balance math • validation (pure)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ ledgerbook-store (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   WorkbookStore ──► WorkbookDocument ──► SheetRepository<R>     │   │
//! │  │        │                   │                                    │   │
//! │  │        │              RowCodec (Cell ⇄ record)                  │   │
//! │  │        │                                                        │   │
//! │  │        ├──► PersistenceGuard  (backup + atomic replace)         │   │
//! │  │        ├──► ReadCache         (TTL, cleared on mutation)        │   │
//! │  │        └──► Debouncer         (coalesces rapid saves)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │                         ledger.xlsx on disk                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - [`StoreConfig`] + [`WorkbookStore`], the public surface
//! - [`document`] - In-memory document graph and xlsx (de)serialization
//! - [`repository`] - Typed CRUD over one sheet, plus per-entity codecs
//! - [`codec`] - The `Cell` model and the [`RowCodec`] trait
//! - [`guard`] - Backup rotation + atomic write-replace
//! - [`cache`] - TTL read cache
//! - [`debounce`] - Per-key write coalescing
//! - [`error`] - [`StoreError`] taxonomy
//!
//! ## Usage Example
//! ```rust,ignore
//! let store = WorkbookStore::new(StoreConfig::new("ledger.xlsx"));
//! store.add_product(product).await?;
//! let invoices = store.invoices().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod codec;
pub mod debounce;
pub mod document;
pub mod error;
pub mod guard;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cache::{ReadCache, DEFAULT_CACHE_TTL};
pub use codec::{Cell, RowCodec};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
pub use document::{Sheet, WorkbookDocument};
pub use error::{StoreError, StoreResult};
pub use guard::{PersistenceGuard, DEFAULT_BACKUP_RETENTION};
pub use repository::customer::REDACTED;
pub use repository::SheetRepository;
pub use store::{StoreConfig, WorkbookStore};
