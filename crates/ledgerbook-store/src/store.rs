//! # Workbook Store
//!
//! Store configuration and the root handle exposing every typed operation.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      WorkbookStore Mutation Path                        │
//! │                                                                         │
//! │  Application startup                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(path) ← workbook path + tuning                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WorkbookStore::new(config) ← owns guard, cache, debouncer, lock       │
//! │       │                                                                 │
//! │       │  store.add_product(p) / store.save_invoice(draft) / ...        │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │ mutate():  lock ─► ensure ─► load ─► closure mutates document │     │
//! │  │            ─► serialize ONCE ─► guard.commit ─► cache.clear   │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! │                                                                         │
//! │  One writer at a time inside this process (tokio::sync::Mutex).        │
//! │  The workbook file itself is NOT locked against other processes.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation surfaces failures as a `StoreResult` carrying a
//! human-readable message; nothing retries, nothing is swallowed except the
//! deliberate soft-fail reads (missing sheet ⇒ empty result set).

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tracing::{debug, info};

use ledgerbook_core::{
    balance, validation, Customer, InventoryMovement, Invoice, InvoiceDraft, InvoiceStatus,
    MovementDraft, Product, Sale,
};

use crate::cache::{ReadCache, DEFAULT_CACHE_TTL};
use crate::codec::RowCodec;
use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
use crate::document::WorkbookDocument;
use crate::error::{StoreError, StoreResult};
use crate::guard::{PersistenceGuard, DEFAULT_BACKUP_RETENTION};
use crate::repository::{customer, invoice, movement, product};

// =============================================================================
// Configuration
// =============================================================================

/// Workbook store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/ledger.xlsx")
///     .backup_retention(10)
///     .cache_ttl(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the canonical workbook file.
    pub workbook_path: PathBuf,

    /// Number of timestamped backups kept alongside the workbook.
    /// Default: 5
    pub backup_retention: usize,

    /// Freshness window for cached reads.
    /// Default: 2 seconds
    pub cache_ttl: Duration,

    /// Delay window for debounced operations.
    /// Default: 300 milliseconds
    pub debounce_window: Duration,
}

impl StoreConfig {
    /// Creates a configuration with defaults for the given workbook path.
    /// The file will be created with the default schema on first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            workbook_path: path.into(),
            backup_retention: DEFAULT_BACKUP_RETENTION,
            cache_ttl: DEFAULT_CACHE_TTL,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }

    /// Sets the backup retention count.
    pub fn backup_retention(mut self, retention: usize) -> Self {
        self.backup_retention = retention;
        self
    }

    /// Sets the read-cache TTL. Zero disables caching.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Sets the debounce window.
    pub fn debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    /// A configuration suited to tests: no read caching (every read sees
    /// the latest write) and no debounce delay.
    pub fn for_tests(path: impl Into<PathBuf>) -> Self {
        StoreConfig::new(path)
            .cache_ttl(Duration::ZERO)
            .debounce_window(Duration::ZERO)
    }
}

// =============================================================================
// WorkbookStore
// =============================================================================

/// Root handle over one workbook file.
///
/// Owns the persistence guard, the read cache and the debouncer as explicit
/// context objects - created at startup, dropped at shutdown, no implicit
/// module singletons anywhere.
pub struct WorkbookStore {
    config: StoreConfig,
    guard: PersistenceGuard,
    cache: ReadCache,
    debouncer: Debouncer,
    /// Serializes the in-process mutation path.
    write_lock: tokio::sync::Mutex<()>,
}

impl WorkbookStore {
    /// Creates a store for the configured workbook path. No I/O happens
    /// until the first operation.
    pub fn new(config: StoreConfig) -> Self {
        info!(
            path = %config.workbook_path.display(),
            retention = config.backup_retention,
            "initializing workbook store"
        );
        let guard = PersistenceGuard::new(&config.workbook_path, config.backup_retention);
        let cache = ReadCache::new(config.cache_ttl);
        let debouncer = Debouncer::new(config.debounce_window);
        WorkbookStore {
            config,
            guard,
            cache,
            debouncer,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Document lifecycle
    // =========================================================================

    /// Guarantees a minimal valid schema exists: when the backing file is
    /// absent, synthesizes the default document (one header-styled sheet
    /// per entity type) and persists it.
    pub async fn ensure(&self) -> StoreResult<()> {
        if fs::try_exists(&self.config.workbook_path).await? {
            return Ok(());
        }
        info!(
            path = %self.config.workbook_path.display(),
            "workbook absent, creating default schema"
        );
        let document = WorkbookDocument::with_default_schema();
        let bytes = document.to_xlsx_bytes()?;
        self.guard.commit(&bytes).await
    }

    /// Loads the full document into memory, ensuring the schema first.
    pub async fn load(&self) -> StoreResult<WorkbookDocument> {
        self.ensure().await?;
        let bytes = fs::read(&self.config.workbook_path).await?;
        WorkbookDocument::from_xlsx_bytes(&bytes)
    }

    /// The single-writer mutation session: lock, load, mutate in memory,
    /// persist once, invalidate the cache.
    ///
    /// If the closure errors, nothing was written - the document only ever
    /// reaches disk through the one `commit` at the end.
    async fn mutate<T, F>(&self, operation: &'static str, apply: F) -> StoreResult<T>
    where
        F: FnOnce(&mut WorkbookDocument) -> StoreResult<T>,
    {
        let _writer = self.write_lock.lock().await;
        let mut document = self.load().await?;
        let output = apply(&mut document)?;
        let bytes = document.to_xlsx_bytes()?;
        self.guard.commit(&bytes).await?;
        self.cache.clear();
        debug!(operation, "mutation persisted");
        Ok(output)
    }

    /// Cached `findAll` for one entity type.
    async fn read_all<R>(&self) -> StoreResult<Vec<R>>
    where
        R: RowCodec + serde::Serialize + serde::de::DeserializeOwned,
    {
        let key = format!("readAll:{}", R::SHEET);
        if let Some(hit) = self.cache.get::<Vec<R>>(&key) {
            debug!(sheet = R::SHEET, "read served from cache");
            return Ok(hit);
        }
        let document = self.load().await?;
        let records = document.decode_all::<R>();
        self.cache.put(&key, &records);
        Ok(records)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All products, in sheet order.
    pub async fn products(&self) -> StoreResult<Vec<Product>> {
        self.read_all::<Product>().await
    }

    /// Adds a product. Rejects a duplicate name with `DuplicateKey`.
    pub async fn add_product(&self, product: Product) -> StoreResult<()> {
        validation::validate_product(&product)?;
        self.mutate("addProduct", |doc| doc.repository::<Product>()?.add(&product))
            .await
    }

    /// Replaces the product stored under `name` (all fields, key included).
    pub async fn update_product(&self, name: &str, product: Product) -> StoreResult<()> {
        validation::validate_product(&product)?;
        self.mutate("updateProduct", |doc| {
            doc.repository::<Product>()?.update(name, &product)
        })
        .await
    }

    /// Physically removes the product row.
    pub async fn delete_product(&self, name: &str) -> StoreResult<()> {
        self.mutate("deleteProduct", |doc| {
            doc.repository::<Product>()?.delete(name)
        })
        .await
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// All customers, in sheet order.
    pub async fn customers(&self) -> StoreResult<Vec<Customer>> {
        self.read_all::<Customer>().await
    }

    /// Adds a customer. Rejects a duplicate name with `DuplicateKey`.
    pub async fn add_customer(&self, customer: Customer) -> StoreResult<()> {
        validation::validate_customer(&customer)?;
        self.mutate("addCustomer", |doc| {
            doc.repository::<Customer>()?.add(&customer)
        })
        .await
    }

    /// Replaces the customer stored under `name`.
    pub async fn update_customer(&self, name: &str, customer: Customer) -> StoreResult<()> {
        validation::validate_customer(&customer)?;
        self.mutate("updateCustomer", |doc| {
            doc.repository::<Customer>()?.update(name, &customer)
        })
        .await
    }

    /// Physically removes the customer row. For customers referenced by
    /// historical invoices, prefer [`anonymize_customer`].
    ///
    /// [`anonymize_customer`]: WorkbookStore::anonymize_customer
    pub async fn delete_customer(&self, name: &str) -> StoreResult<()> {
        self.mutate("deleteCustomer", |doc| {
            doc.repository::<Customer>()?.delete(name)
        })
        .await
    }

    /// GDPR removal: redacts the customer's contact fields in place,
    /// keeping the name so historical references stay resolvable.
    pub async fn anonymize_customer(&self, name: &str) -> StoreResult<Customer> {
        self.mutate("anonymizeCustomer", |doc| {
            customer::anonymize(&mut doc.repository::<Customer>()?, name)
        })
        .await
    }

    // =========================================================================
    // Sales & Invoices
    // =========================================================================

    /// All sale line items, in sheet order.
    pub async fn sales(&self) -> StoreResult<Vec<Sale>> {
        self.read_all::<Sale>().await
    }

    /// All invoices with their line items joined from the Sales sheet.
    pub async fn invoices(&self) -> StoreResult<Vec<Invoice>> {
        let key = "readAll:Invoices+items";
        if let Some(hit) = self.cache.get::<Vec<Invoice>>(key) {
            debug!("invoice read served from cache");
            return Ok(hit);
        }
        let document = self.load().await?;
        let invoices = invoice::join_items(
            document.decode_all::<Invoice>(),
            document.decode_all::<Sale>(),
        );
        self.cache.put(key, &invoices);
        Ok(invoices)
    }

    /// Saves an invoice with its line items in one persisted write.
    ///
    /// ## What This Does (single mutation session)
    /// 1. Resolves each line's product and freezes `total`/`profit`
    /// 2. Appends the Invoice row with totals summed over the lines
    /// 3. Appends one Sales row per line, stamped with the invoice id/date
    /// 4. Applies a negative stock delta to each referenced product
    ///
    /// Any failure (unknown product, duplicate invoice id, missing sheet)
    /// aborts before the single write at the end, so no partial state ever
    /// reaches disk. Returns the saved invoice with items attached.
    pub async fn save_invoice(&self, draft: InvoiceDraft) -> StoreResult<Invoice> {
        validation::validate_invoice_draft(&draft)?;
        self.mutate("saveInvoice", move |doc| {
            let products = doc.decode_all::<Product>();

            let mut items = Vec::with_capacity(draft.items.len());
            for line in &draft.items {
                let product = products
                    .iter()
                    .find(|p| p.name == line.product_name)
                    .ok_or_else(|| StoreError::not_found(Product::ENTITY, &line.product_name))?;
                let total = balance::line_total(line.quantity, line.unit_price);
                let profit =
                    balance::line_profit(line.quantity, line.unit_price, product.buy_price);
                items.push(Sale {
                    invoice_id: draft.invoice_id.clone(),
                    product_name: line.product_name.clone(),
                    date: draft.date.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    total,
                    profit,
                });
            }

            // Frozen at save time: totals are sums over the frozen lines
            let saved = Invoice {
                invoice_id: draft.invoice_id.clone(),
                date: draft.date.clone(),
                customer_name: draft.customer_name.clone(),
                total_amount: items.iter().map(|i| i.total).sum(),
                total_profit: items.iter().map(|i| i.profit).sum(),
                status: draft.status,
                items: items.clone(),
            };

            doc.repository::<Invoice>()?.add(&saved)?;
            {
                let mut sales = doc.repository::<Sale>()?;
                for item in &items {
                    sales.add(item)?;
                }
            }
            {
                let mut products = doc.repository::<Product>()?;
                for line in &draft.items {
                    product::apply_stock_delta(&mut products, &line.product_name, -line.quantity)?;
                }
            }

            debug!(
                invoice_id = %saved.invoice_id,
                lines = saved.items.len(),
                total = saved.total_amount,
                "invoice assembled"
            );
            Ok(saved)
        })
        .await
    }

    /// Changes an invoice's status - the only supported post-save mutation.
    pub async fn update_invoice_status(
        &self,
        invoice_id: &str,
        status: InvoiceStatus,
    ) -> StoreResult<()> {
        self.mutate("updateInvoiceStatus", |doc| {
            let mut invoices = doc.repository::<Invoice>()?;
            let mut target = invoices
                .find(invoice_id)
                .ok_or_else(|| StoreError::not_found(Invoice::ENTITY, invoice_id))?;
            target.status = status;
            invoices.update(invoice_id, &target)
        })
        .await
    }

    // =========================================================================
    // Inventory Movements
    // =========================================================================

    /// All inventory movements, in sheet order.
    pub async fn movements(&self) -> StoreResult<Vec<InventoryMovement>> {
        self.read_all::<InventoryMovement>().await
    }

    /// Records an inventory movement and applies its delta to the product,
    /// in one persisted write.
    ///
    /// `IN` adds, `OUT` subtracts, `ADJUSTMENT` treats the draft quantity
    /// as a target balance - `balance_after` always lands on the target
    /// regardless of the prior state. Returns the stored movement.
    pub async fn add_inventory_movement(
        &self,
        draft: MovementDraft,
    ) -> StoreResult<InventoryMovement> {
        validation::validate_movement_draft(&draft)?;
        self.mutate("addInventoryMovement", move |doc| {
            let current = doc
                .decode_all::<Product>()
                .into_iter()
                .find(|p| p.name == draft.product_name)
                .ok_or_else(|| StoreError::not_found(Product::ENTITY, &draft.product_name))?
                .quantity;

            let (delta, balance_after) =
                balance::apply_movement(draft.movement_type, draft.quantity, current);
            let sequence = movement::next_sequence(
                &doc.decode_all::<InventoryMovement>(),
                &draft.date,
                &draft.product_name,
            );

            let stored = InventoryMovement {
                date: draft.date.clone(),
                product_name: draft.product_name.clone(),
                sequence,
                movement_type: draft.movement_type,
                quantity: draft.quantity,
                reference: draft.reference.clone(),
                notes: draft.notes.clone(),
                balance_after,
            };

            doc.repository::<InventoryMovement>()?.add(&stored)?;
            product::apply_stock_delta(
                &mut doc.repository::<Product>()?,
                &draft.product_name,
                delta,
            )?;

            debug!(
                product = %stored.product_name,
                kind = %stored.movement_type,
                delta,
                balance_after,
                "movement recorded"
            );
            Ok(stored)
        })
        .await
    }

    // =========================================================================
    // Export & Debounce
    // =========================================================================

    /// Copies one sheet's cell values verbatim into a new single-sheet
    /// workbook at `out_path`. Strict: naming a missing sheet is
    /// `SheetNotFound` (the caller asked for that sheet specifically).
    pub async fn export_sheet(&self, name: &str, out_path: impl AsRef<Path>) -> StoreResult<()> {
        let document = self.load().await?;
        let sheet = document
            .sheet(name)
            .ok_or_else(|| StoreError::sheet_not_found(name))?
            .clone();
        let bytes = WorkbookDocument::from_single_sheet(sheet).to_xlsx_bytes()?;
        fs::write(out_path.as_ref(), &bytes).await?;
        info!(sheet = name, out = %out_path.as_ref().display(), "sheet exported");
        Ok(())
    }

    /// Debounces an operation by key: rapid repeated calls within the
    /// configured window coalesce, and a superseded call resolves to `None`
    /// without executing. Intended for rapid-fire UI-triggered saves.
    pub async fn debounced<F, Fut, T>(&self, key: &str, op: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.debouncer.run(key, op).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/ledger.xlsx")
            .backup_retention(10)
            .cache_ttl(Duration::from_secs(5))
            .debounce_window(Duration::from_millis(100));

        assert_eq!(config.backup_retention, 10);
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
        assert_eq!(config.debounce_window, Duration::from_millis(100));
    }

    #[test]
    fn test_for_tests_disables_cache_and_debounce() {
        let config = StoreConfig::for_tests("/tmp/ledger.xlsx");
        assert_eq!(config.cache_ttl, Duration::ZERO);
        assert_eq!(config.debounce_window, Duration::ZERO);
        assert_eq!(config.backup_retention, DEFAULT_BACKUP_RETENTION);
    }

    #[tokio::test]
    async fn test_ensure_creates_schema_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = WorkbookStore::new(StoreConfig::for_tests(dir.path().join("ledger.xlsx")));

        store.ensure().await.unwrap();
        let document = store.load().await.unwrap();
        assert_eq!(document.sheet_names().len(), 5);

        // Second ensure is a no-op: no backup appears
        store.ensure().await.unwrap();
        let backups = PersistenceGuard::new(dir.path().join("ledger.xlsx"), 5)
            .list_backups()
            .await
            .unwrap();
        assert!(backups.is_empty());
    }
}
