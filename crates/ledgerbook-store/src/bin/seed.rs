//! # Seed Data Generator
//!
//! Populates a workbook with test data for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default workbook with 40 products
//! cargo run -p ledgerbook-store --bin seed
//!
//! # Custom product count
//! cargo run -p ledgerbook-store --bin seed -- --products 100
//!
//! # Specify workbook path
//! cargo run -p ledgerbook-store --bin seed -- --path ./data/ledger.xlsx
//! ```
//!
//! ## Generated Data
//! - Products across Hardware / Stationery / Electronics categories, each
//!   with a `{CAT}-{INDEX}` SKU, a margin-positive price pair and stock
//! - Two customers
//! - One invoice for the first customer (exercises the Sales join and the
//!   stock deduction)
//! - One IN movement (exercises the derived balance)

use std::env;

use ledgerbook_core::{
    Customer, InvoiceDraft, InvoiceStatus, LineDraft, MovementDraft, MovementType, Product,
};
use ledgerbook_store::{StoreConfig, WorkbookStore};
use tracing_subscriber::EnvFilter;

/// Category code + product names for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "HW",
        &[
            "Widget",
            "Gadget",
            "Sprocket",
            "Flange",
            "Bracket",
            "Hinge Set",
            "Bolt Pack M6",
            "Bolt Pack M8",
            "Washer Assortment",
            "Wall Anchor Kit",
            "Door Handle",
            "Cabinet Knob",
            "Drawer Slide",
            "Corner Brace",
            "Hook Rail",
        ],
    ),
    (
        "ST",
        &[
            "Notebook A5",
            "Notebook A4",
            "Ballpoint Pen",
            "Gel Pen",
            "Pencil HB",
            "Eraser",
            "Stapler",
            "Staple Refill",
            "Paper Clips",
            "Sticky Notes",
            "Envelope Pack",
            "Printer Paper",
            "Marker Set",
            "Ruler 30cm",
            "Scissors",
        ],
    ),
    (
        "EL",
        &[
            "USB Cable",
            "HDMI Cable",
            "Power Strip",
            "AA Battery Pack",
            "AAA Battery Pack",
            "LED Bulb",
            "Extension Cord",
            "Phone Charger",
            "Mouse",
            "Keyboard",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut path = String::from("./ledger.xlsx");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-n" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--path" | "-p" => {
                if i + 1 < args.len() {
                    path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Ledgerbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --products <N>   Number of products to generate (default: 40)");
                println!("  -p, --path <PATH>    Workbook file path (default: ./ledger.xlsx)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Ledgerbook Seed Data Generator");
    println!("=================================");
    println!("Workbook: {}", path);
    println!("Products: {}", count);
    println!();

    let store = WorkbookStore::new(StoreConfig::new(&path));
    store.ensure().await?;
    println!("✓ Workbook ready");

    // Check existing products
    let existing = store.products().await?.len();
    if existing > 0 {
        println!("⚠ Workbook already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the workbook file to regenerate.");
        return Ok(());
    }

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_code, names) in CATEGORIES {
        for (index, name) in names.iter().enumerate() {
            if generated >= count {
                break 'outer;
            }

            let product = generate_product(category_code, name, index);
            if let Err(e) = store.add_product(product).await {
                eprintln!("Failed to add {}: {}", name, e);
                continue;
            }

            generated += 1;
            if generated % 10 == 0 {
                println!("  Generated {} products...", generated);
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Customers
    store
        .add_customer(Customer {
            name: "Acme Traders".into(),
            phone: "555-0100".into(),
            email: "orders@acme.example".into(),
            address: "1 Main St".into(),
        })
        .await?;
    store
        .add_customer(Customer {
            name: "Walk-in".into(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
        })
        .await?;
    println!("✓ Seeded 2 customers");

    // One invoice against the first seeded product
    let first = store.products().await?.remove(0);
    let invoice = store
        .save_invoice(InvoiceDraft {
            invoice_id: "INV-0001".into(),
            date: "2026-01-15".into(),
            customer_name: "Acme Traders".into(),
            status: InvoiceStatus::Paid,
            items: vec![LineDraft {
                product_name: first.name.clone(),
                quantity: 2.0,
                unit_price: first.sale_price,
            }],
        })
        .await?;
    println!(
        "✓ Seeded invoice {} (total {:.2}, profit {:.2})",
        invoice.invoice_id, invoice.total_amount, invoice.total_profit
    );

    // One inbound movement on the same product
    let movement = store
        .add_inventory_movement(MovementDraft {
            date: "2026-01-16".into(),
            product_name: first.name.clone(),
            movement_type: MovementType::In,
            quantity: 5.0,
            reference: "PO-1001".into(),
            notes: "restock".into(),
        })
        .await?;
    println!(
        "✓ Seeded movement {} #{} (balance after: {})",
        movement.product_name, movement.sequence, movement.balance_after
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic pseudo-varied data.
fn generate_product(category: &str, name: &str, index: usize) -> Product {
    let buy_price = 2.0 + (index % 7) as f64 * 1.5;
    Product {
        name: name.to_string(),
        quantity: 10.0 + (index % 5) as f64 * 4.0,
        buy_price,
        sale_price: buy_price * 1.8,
        reorder_level: 5.0,
        category: category.to_string(),
        sku: format!("{}-{:03}", category, index + 1),
    }
}
