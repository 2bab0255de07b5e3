//! # Customer Sheet
//!
//! Codec and GDPR helpers for the Customers sheet.
//!
//! ## Sheet Layout
//! ```text
//! │ Name  │ Phone │ Email │ Address │
//! │ (key) │       │       │         │
//! ```
//!
//! ## Anonymize vs Delete
//! Two distinct operations, never a hidden mode flag on delete:
//! - `delete` physically splices the row (for customers never invoiced)
//! - [`anonymize`] overwrites the contact fields in place and KEEPS the
//!   name, because historical Invoices/Sales reference customers by name
//!   and must keep resolving after a GDPR removal request

use ledgerbook_core::Customer;

use crate::codec::{blank_at, text_at, Cell, RowCodec};
use crate::error::{StoreError, StoreResult};
use crate::repository::SheetRepository;

/// Placeholder written over anonymized contact fields.
pub const REDACTED: &str = "REDACTED";

impl RowCodec for Customer {
    const ENTITY: &'static str = "Customer";
    const SHEET: &'static str = "Customers";
    const HEADERS: &'static [&'static str] = &["Name", "Phone", "Email", "Address"];
    const KEY_COLUMN: usize = 0;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn decode(row: &[Cell]) -> Option<Self> {
        if blank_at(row, Self::KEY_COLUMN) {
            return None;
        }
        Some(Customer {
            name: text_at(row, 0),
            phone: text_at(row, 1),
            email: text_at(row, 2),
            address: text_at(row, 3),
        })
    }

    fn encode(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.name.clone()),
            Cell::text(self.phone.clone()),
            Cell::text(self.email.clone()),
            Cell::text(self.address.clone()),
        ]
    }
}

/// Anonymizes a customer in place: contact fields become [`REDACTED`], the
/// name stays untouched. Fails with `NotFound` when the customer is absent.
pub fn anonymize(repo: &mut SheetRepository<'_, Customer>, name: &str) -> StoreResult<Customer> {
    let mut customer = repo
        .find(name)
        .ok_or_else(|| StoreError::not_found(Customer::ENTITY, name))?;
    customer.phone = REDACTED.to_string();
    customer.email = REDACTED.to_string();
    customer.address = REDACTED.to_string();
    repo.update(name, &customer)?;
    Ok(customer)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Sheet;

    fn acme() -> Customer {
        Customer {
            name: "Acme".into(),
            phone: "555-0100".into(),
            email: "orders@acme.example".into(),
            address: "1 Main St".into(),
        }
    }

    #[test]
    fn test_codec_roundtrip() {
        let customer = acme();
        assert_eq!(Customer::decode(&customer.encode()).unwrap(), customer);
    }

    #[test]
    fn test_anonymize_keeps_name_redacts_contact() {
        let mut sheet = Sheet::with_headers(Customer::SHEET, Customer::HEADERS);
        let mut repo = SheetRepository::<Customer>::new(&mut sheet);
        repo.add(&acme()).unwrap();

        let anonymized = anonymize(&mut repo, "Acme").unwrap();
        assert_eq!(anonymized.name, "Acme");
        assert_eq!(anonymized.phone, REDACTED);
        assert_eq!(anonymized.email, REDACTED);
        assert_eq!(anonymized.address, REDACTED);

        // Row stays in place - still one customer, still findable by name
        assert_eq!(repo.find_all().len(), 1);
        assert_eq!(repo.find("Acme").unwrap().email, REDACTED);
    }

    #[test]
    fn test_anonymize_missing_customer() {
        let mut sheet = Sheet::with_headers(Customer::SHEET, Customer::HEADERS);
        let mut repo = SheetRepository::<Customer>::new(&mut sheet);
        assert!(matches!(
            anonymize(&mut repo, "Ghost"),
            Err(StoreError::NotFound { .. })
        ));
    }
}
