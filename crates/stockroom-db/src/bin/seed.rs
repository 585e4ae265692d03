//! # Seed Data Generator
//!
//! Populates the database with a small demo catalog and opening stock.
//!
//! ## Usage
//! ```bash
//! # Seed ./stockroom_dev.db
//! cargo run -p stockroom-db --bin seed
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! - A `seed` user that signs the opening imports. Its password hash is not a
//!   valid PHC string, so nobody can log in as it.
//! - One category per entry in [`CATALOG`] with its products
//! - An opening import for every product

use std::env;

use stockroom_core::{CategoryDraft, MovementDraft, NewUser, ProductDraft};
use stockroom_db::{Database, DbConfig, LedgerOutcome};

/// (category, [(sku, name, opening stock)])
const CATALOG: &[(&str, &[(&str, &str, i64)])] = &[
    (
        "Beverages",
        &[
            ("BEV-COLA-330", "Cola 330ml", 240),
            ("BEV-WATER-500", "Still Water 500ml", 480),
            ("BEV-OJ-1L", "Orange Juice 1L", 60),
        ],
    ),
    (
        "Snacks",
        &[
            ("SNK-CHIPS-150", "Salted Chips 150g", 120),
            ("SNK-NUTS-200", "Mixed Nuts 200g", 45),
        ],
    ),
    (
        "Hardware",
        &[
            ("HW-SCREW-M4", "M4 Screws (100)", 30),
            ("HW-BOLT-M8", "M8 Bolts (50)", 0),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let user = match db.users().find_by_username("seed").await? {
        Some(user) => user,
        None => {
            db.users()
                .create(NewUser {
                    username: "seed".to_string(),
                    email: "seed@localhost.localdomain".to_string(),
                    password_hash: "!".to_string(),
                })
                .await?
        }
    };

    let mut products = 0;
    let mut units = 0;

    for (category_name, items) in CATALOG {
        let category = db
            .categories()
            .create(CategoryDraft {
                name: category_name.to_string(),
                description: String::new(),
            })
            .await?;

        for (sku, name, opening) in items.iter() {
            let product = db
                .products()
                .create(ProductDraft {
                    name: name.to_string(),
                    description: String::new(),
                    image_url: None,
                    sku: sku.to_string(),
                    category_id: Some(category.id),
                })
                .await?;
            products += 1;

            if *opening == 0 {
                continue;
            }

            let draft = MovementDraft::import(product.id, user.id, *opening, "opening stock");
            match db.stock().record_import(draft).await? {
                LedgerOutcome::Applied { .. } => units += opening,
                other => eprintln!("Opening stock for {} not applied: {:?}", sku, other),
            }
        }
    }

    println!();
    println!("✓ Created {} categories", CATALOG.len());
    println!("✓ Created {} products", products);
    println!("✓ Imported {} units of opening stock", units);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
