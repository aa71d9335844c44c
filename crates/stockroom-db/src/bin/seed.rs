//! # Seed Data Generator
//!
//! Populates the database with demo categories and stock items.
//!
//! ## Usage
//! ```bash
//! # Generate up to 200 stocks (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p stockroom-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! Five categories (Beverages, Snacks, Dairy, Frozen, Grocery), each with
//! items in several sizes. Inventory cycles through 0..=100 so that some
//! items show as out of stock.

use std::env;
use stockroom_core::StockFilter;
use stockroom_db::{Database, DbConfig};

/// Categories and item names for realistic demo data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Beverages",
        &[
            "Coca-Cola",
            "Sprite",
            "Orange Juice",
            "Sparkling Water",
            "Iced Tea",
            "Lemonade",
            "Cold Brew Coffee",
            "Energy Drink",
        ],
    ),
    (
        "Snacks",
        &[
            "Potato Chips",
            "Tortilla Chips",
            "Pretzels",
            "Chocolate Bar",
            "Gummy Bears",
            "Trail Mix",
            "Popcorn",
            "Rice Crackers",
        ],
    ),
    (
        "Dairy",
        &[
            "Whole Milk",
            "Oat Milk",
            "Cheddar Cheese",
            "Greek Yogurt",
            "Butter",
            "Cream Cheese",
            "Eggs",
            "Sour Cream",
        ],
    ),
    (
        "Frozen",
        &[
            "Vanilla Ice Cream",
            "Frozen Pizza",
            "Frozen Vegetables",
            "Fish Sticks",
            "Frozen Waffles",
            "Dumplings",
            "Sorbet",
            "Frozen Berries",
        ],
    ),
    (
        "Grocery",
        &[
            "Spaghetti",
            "Basmati Rice",
            "Canned Tomatoes",
            "Olive Oil",
            "Peanut Butter",
            "Rolled Oats",
            "Flour",
            "Sugar",
        ],
    ),
];

/// Size variants for items
const SIZES: &[&str] = &["Small", "Regular", "Large", "Family Pack", "Bulk"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./stockroom.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
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
                println!("  -c, --count <N>    Number of stock items to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockroom Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Stocks:   {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let mut session = db.session().await?;

    let existing = session.stocks().count(&StockFilter::default()).await?;
    if existing > 0 {
        println!("⚠ Database already has {} stock items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating data...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'categories: for (category_name, items) in CATEGORIES {
        let category = match session.categories().find_by_name(category_name, None).await? {
            Some(existing) => existing,
            None => session.categories().insert(category_name).await?,
        };

        for item in items.iter() {
            for size in SIZES {
                if generated >= count {
                    break 'categories;
                }

                let name = format!("{} {}", item, size);
                let inventory = ((generated * 37) % 101) as i64;

                if let Err(e) = session
                    .stocks()
                    .insert(&name, inventory, category.id)
                    .await
                {
                    eprintln!("Failed to insert {}: {}", name, e);
                    continue;
                }

                generated += 1;
            }
        }

        println!("  {} ✓", category_name);
    }

    session.commit().await?;

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} stock items in {:?}", generated, elapsed);

    // Verify the listing filter
    println!();
    println!("Verifying search...");
    let mut session = db.session().await?;
    let matches = session
        .stocks()
        .count(&StockFilter::new(None, Some("milk")))
        .await?;
    println!("  Search 'milk': {} results", matches);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
