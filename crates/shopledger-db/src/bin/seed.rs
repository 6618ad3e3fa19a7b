//! Seeds a ShopLedger database with demo data.
//!
//! ## Usage
//! ```bash
//! cargo run --bin seed -- [database-path]
//! ```
//! Defaults to `./shopledger.db`. Running twice is harmless: rows that
//! already exist are skipped.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shopledger_core::{NewProduct, NewWorker, Product, ProductType, Shop, Worker};
use shopledger_db::{Database, DbConfig, DbError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./shopledger.db".to_string());

    info!(path = %path, "Seeding demo data");

    let db = Database::new(DbConfig::new(&path)).await?;

    seed_shops(&db).await?;
    seed_products(&db).await?;
    seed_workers(&db).await?;

    let product_count = db.products().count().await?;
    info!(products = product_count, "Seeding complete");

    db.close().await;
    Ok(())
}

async fn seed_shops(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let shops = [
        ("Main Counter", Some("MG Road".to_string())),
        ("Godown Counter", Some("Industrial Area Phase 2".to_string())),
    ];

    for (name, location) in shops {
        let shop = Shop::create(name, location)?;
        match db.shops().insert(&shop).await {
            Ok(()) => info!(name = %shop.name, "Shop created"),
            Err(DbError::UniqueViolation { .. }) => {
                warn!(name = %shop.name, "Shop already exists, skipping")
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

async fn seed_products(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    // Prices in paise.
    let catalog = [
        ("Basmati Rice 5kg", "Grocery", "RICE-5KG", 45000, 52000, 40, "bag"),
        ("Toor Dal 1kg", "Grocery", "DAL-TOOR-1KG", 11000, 13500, 60, "packet"),
        ("Sunflower Oil 1L", "Grocery", "OIL-SUN-1L", 12500, 14500, 48, "bottle"),
        ("Amul Milk 500ml", "Dairy", "MILK-500ML", 2600, 3000, 120, "pouch"),
        ("Paneer 200g", "Dairy", "PANEER-200G", 7500, 9000, 25, "packet"),
        ("Parle-G Biscuit", "Snacks", "BISC-PARLE-G", 800, 1000, 200, "packet"),
        ("Tata Salt 1kg", "Grocery", "SALT-1KG", 2200, 2800, 80, "packet"),
        ("Red Label Tea 250g", "Beverages", "TEA-RL-250G", 12000, 14000, 35, "box"),
    ];

    for (name, category, sku, net, selling, stock, unit) in catalog {
        let product = Product::create(NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            sku: sku.to_string(),
            net_price_paise: net,
            selling_price_paise: selling,
            stock_level: stock,
            stock_alert_threshold: None,
            unit: Some(unit.to_string()),
            product_type: ProductType::FinishedProduct,
        })?;

        match db.products().insert(&product).await {
            Ok(()) => info!(sku = %product.sku, "Product created"),
            Err(DbError::UniqueViolation { .. }) => {
                warn!(sku = %product.sku, "Product already exists, skipping")
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

async fn seed_workers(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let staff = [
        ("Ramesh Kumar", "ramesh", "Sales", 1_800_000),
        ("Sunita Devi", "sunita", "Warehouse", 1_600_000),
    ];

    for (name, username, department, salary_paise) in staff {
        let worker = Worker::create(NewWorker {
            name: name.to_string(),
            username: username.to_string(),
            department: department.to_string(),
            salary_paise,
            shift_start: Some("09:00".to_string()),
            shift_end: Some("18:00".to_string()),
        })?;

        match db.workers().insert(&worker).await {
            Ok(()) => info!(username = %worker.username, "Worker created"),
            Err(DbError::UniqueViolation { .. }) => {
                warn!(username = %worker.username, "Worker already exists, skipping")
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
