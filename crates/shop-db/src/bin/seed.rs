//! # Seed Data Generator
//!
//! Creates the default accounts and a starter computer-parts catalog.
//!
//! ## Usage
//! ```bash
//! # Seed ./shop.db
//! cargo run -p shop-db --bin seed
//!
//! # Specify database path
//! cargo run -p shop-db --bin seed -- --db ./data/shop.db
//!
//! # Accounts only, no catalog
//! cargo run -p shop-db --bin seed -- --accounts-only
//! ```
//!
//! ## Default Accounts
//! - `manager` / `admin123` (manager)
//! - `user` / `user123` (customer)

use shop_core::{Money, NewProduct};
use shop_db::{Database, DbConfig};
use std::env;

/// Starter catalog: (name, price in pesos, stock, category, details).
const CATALOG: &[(&str, i64, i64, &str, &str)] = &[
    ("Kingston A400 SSD 480GB", 1_850, 25, "Storage", "SATA III 2.5\""),
    ("Samsung 980 NVMe SSD 1TB", 4_750, 12, "Storage", "PCIe 3.0 x4 M.2"),
    ("Seagate Barracuda HDD 2TB", 3_200, 8, "Storage", "7200 RPM"),
    ("Kingston Fury Beast 16GB DDR4", 2_450, 20, "Memory", "3200 MHz"),
    ("Corsair Vengeance 32GB DDR5", 6_900, 6, "Memory", "5600 MHz, 2x16GB"),
    ("AMD Ryzen 5 5600", 6_450, 10, "Processors", "6 cores, AM4"),
    ("Intel Core i5-12400F", 7_200, 7, "Processors", "6 cores, LGA1700"),
    ("MSI B550M PRO-VDH WiFi", 6_100, 5, "Motherboards", "Micro-ATX, AM4"),
    ("Gigabyte RTX 4060 Eagle OC 8GB", 18_500, 4, "Graphics Cards", "GDDR6"),
    ("Corsair CV550 550W", 2_650, 15, "Power Supplies", "80+ Bronze"),
    ("Arctic MX-4 Thermal Paste 4g", 350, 40, "Cooling", ""),
    ("DeepCool AK400 CPU Cooler", 1_750, 9, "Cooling", "Single tower, 120mm"),
    ("Logitech G102 Mouse", 995, 30, "Peripherals", "RGB, 8000 DPI"),
    ("Rakk Kimat Mechanical Keyboard", 1_495, 3, "Peripherals", "Outemu Blue switches"),
    ("UGREEN HDMI Cable 2m", 420, 50, "Cables", "4K 60Hz"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./shop.db");
    let mut accounts_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--accounts-only" => accounts_only = true,
            "--help" | "-h" => {
                println!("ShopSystem Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>      Database file path (default: ./shop.db)");
                println!("      --accounts-only  Create default accounts, skip the catalog");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 ShopSystem Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let created = db.credentials().ensure_default_accounts().await?;
    println!("✓ Default accounts ready ({} created)", created);

    if accounts_only {
        return Ok(());
    }

    let existing = db.products().count_active().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping catalog to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Adding catalog...");

    let mut added = 0;
    for &(name, price, stock, category, details) in CATALOG {
        let code = db.products().next_code().await?;
        let product = NewProduct {
            code,
            name: name.to_string(),
            price: Money::from_major(price),
            stock_qty: stock,
            category: category.to_string(),
            details: Some(details.to_string()),
        };

        match db.products().add(product).await {
            Ok(product) => {
                added += 1;
                println!("  {} {}", product.code, product.name);
            }
            Err(e) => eprintln!("Failed to add {}: {}", name, e),
        }
    }

    println!();
    println!("✓ Added {} products", added);
    println!("  Categories: {}", db.products().categories().await?.join(", "));

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
