//! # Invoices Sheet
//!
//! Codec and join helpers for invoices.
//!
//! ## Sheet Layout
//! ```text
//! │ Invoice ID │ Date │ Customer │ Total Amount │ Total Profit │ Status │
//! │   (key)    │      │          │  Σ items     │  Σ items     │        │
//! ```
//!
//! ## Join Semantics
//! Line items are never nested in the Invoices row. An invoice read back
//! from disk carries an empty `items` vec until [`join_items`] resolves its
//! Sales rows by invoice id. Totals are frozen at save time and - since
//! line items are immutable post-save - can never drift from their items.

use std::collections::HashMap;

use ledgerbook_core::{Invoice, InvoiceStatus, Sale};

use crate::codec::{blank_at, number_at, text_at, Cell, RowCodec};

impl RowCodec for Invoice {
    const ENTITY: &'static str = "Invoice";
    const SHEET: &'static str = "Invoices";
    const HEADERS: &'static [&'static str] = &[
        "Invoice ID",
        "Date",
        "Customer",
        "Total Amount",
        "Total Profit",
        "Status",
    ];
    const KEY_COLUMN: usize = 0;

    fn key(&self) -> String {
        self.invoice_id.clone()
    }

    fn decode(row: &[Cell]) -> Option<Self> {
        if blank_at(row, Self::KEY_COLUMN) {
            return None;
        }
        Some(Invoice {
            invoice_id: text_at(row, 0),
            date: text_at(row, 1),
            customer_name: text_at(row, 2),
            total_amount: number_at(row, 3),
            total_profit: number_at(row, 4),
            status: InvoiceStatus::parse_lenient(&text_at(row, 5)),
            items: Vec::new(),
        })
    }

    fn encode(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.invoice_id.clone()),
            Cell::text(self.date.clone()),
            Cell::text(self.customer_name.clone()),
            Cell::number(self.total_amount),
            Cell::number(self.total_profit),
            Cell::text(self.status.as_str()),
        ]
    }
}

/// Resolves each invoice's line items from the Sales rows, joining on
/// invoice id. Sales order within an invoice follows file order.
pub fn join_items(mut invoices: Vec<Invoice>, sales: Vec<Sale>) -> Vec<Invoice> {
    let mut by_invoice: HashMap<String, Vec<Sale>> = HashMap::new();
    for sale in sales {
        by_invoice
            .entry(sale.invoice_id.clone())
            .or_default()
            .push(sale);
    }
    for invoice in &mut invoices {
        invoice.items = by_invoice.remove(&invoice.invoice_id).unwrap_or_default();
    }
    invoices
}

// =============================================================================
// Unit Tests
// =============================================================================
