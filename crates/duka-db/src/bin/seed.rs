//! # Seed Data Generator
//!
//! Populates the database with test customers and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults
//! cargo run -p duka-db --bin seed
//!
//! # Specify database path
//! cargo run -p duka-db --bin seed -- --db ./data/duka.db
//!
//! # Also record a couple of demo sales
//! cargo run -p duka-db --bin seed -- --with-sales
//! ```
//!
//! ## Generated Data
//! - Customers with assorted credit limits (some with no credit at all)
//! - Shop staples across two shops with realistic stock levels
//! - Optionally a cash sale and a credit sale, so reports have content

use std::env;

use duka_core::{NewCustomer, NewProduct, NewSale, NewSaleItem, PaymentMethod, SaleType};
use duka_db::{Database, DbConfig};

/// (name, phone, max_credit_limit in minor units)
const CUSTOMERS: &[(&str, &str, i64)] = &[
    ("Asha Namutebi", "0700111001", 200_000),
    ("Okello Brian", "0700111002", 50_000),
    ("Amara Kintu", "0700111003", 0),
    ("Zawadi Achieng", "0700111004", 500_000),
    ("Musa Kirabo", "0700111005", 100_000),
];

/// (name, price in minor units, stock, shop)
const PRODUCTS: &[(&str, i64, i64, &str)] = &[
    ("Posho Maize Flour 1kg", 4_500, 120, "shop-1"),
    ("Rice Super 5kg", 28_000, 40, "shop-1"),
    ("Sugar 1kg", 5_200, 200, "shop-1"),
    ("Cooking Oil 1L", 11_000, 60, "shop-1"),
    ("Soap Bar", 2_500, 300, "shop-1"),
    ("Milk 500ml", 2_000, 80, "shop-1"),
    ("Tea Leaves 250g", 6_500, 90, "shop-1"),
    ("Salt 500g", 1_000, 250, "shop-1"),
    ("Bread Loaf", 5_000, 35, "shop-2"),
    ("Eggs Tray 30", 15_000, 25, "shop-2"),
    ("Matches Box", 500, 400, "shop-2"),
    ("Paraffin 1L", 7_500, 50, "shop-2"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./duka_dev.db");
    let mut with_sales = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-sales" => with_sales = true,
            "--help" | "-h" => {
                println!("Duka POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./duka_dev.db)");
                println!("      --with-sales   Also record demo sales");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Duka POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing data
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding customers...");

    let mut customers = Vec::new();
    for (name, phone, limit) in CUSTOMERS {
        let customer = db
            .customers()
            .insert(&NewCustomer {
                name: (*name).to_string(),
                email: None,
                phone: Some((*phone).to_string()),
                max_credit_limit: *limit,
            })
            .await?;
        customers.push(customer);
    }
    println!("✓ Seeded {} customers", customers.len());

    println!("Seeding products...");

    let mut products = Vec::new();
    for (name, price, stock, shop) in PRODUCTS {
        let product = db
            .products()
            .insert(&NewProduct {
                name: (*name).to_string(),
                image_url: None,
                price: *price,
                stock_qty: *stock,
                shop_id: Some((*shop).to_string()),
            })
            .await?;
        products.push(product);
    }
    println!("✓ Seeded {} products", products.len());

    if with_sales {
        println!();
        println!("Recording demo sales...");

        // A cash sale: two staples, settled at the counter.
        let soap = &products[4];
        let sugar = &products[2];
        let cash_total = 2 * soap.price + sugar.price;
        let cash = db
            .sales()
            .create_sale(&NewSale {
                customer_id: None,
                customer_name: None,
                customer_email: None,
                sale_amount: cash_total,
                balance_amount: 0,
                paid_amount: cash_total,
                sale_type: SaleType::Paid,
                payment_method: PaymentMethod::Cash,
                transaction_code: None,
                shop_id: Some("shop-1".to_string()),
                sale_items: vec![
                    NewSaleItem {
                        product_id: soap.id.clone(),
                        qty: 2,
                        product_price: soap.price,
                        product_name: soap.name.clone(),
                        product_image: None,
                    },
                    NewSaleItem {
                        product_id: sugar.id.clone(),
                        qty: 1,
                        product_price: sugar.price,
                        product_name: sugar.name.clone(),
                        product_image: None,
                    },
                ],
            })
            .await?;
        println!("  Cash sale {} recorded", cash.sale.sale_number);

        // A credit sale: rice on the books for a known customer.
        let rice = &products[1];
        let customer = &customers[0];
        let credit = db
            .sales()
            .create_sale(&NewSale {
                customer_id: Some(customer.id.clone()),
                customer_name: Some(customer.name.clone()),
                customer_email: customer.email.clone(),
                sale_amount: rice.price,
                balance_amount: rice.price,
                paid_amount: 0,
                sale_type: SaleType::Credit,
                payment_method: PaymentMethod::Cash,
                transaction_code: None,
                shop_id: Some("shop-1".to_string()),
                sale_items: vec![NewSaleItem {
                    product_id: rice.id.clone(),
                    qty: 1,
                    product_price: rice.price,
                    product_name: rice.name.clone(),
                    product_image: None,
                }],
            })
            .await?;
        println!("  Credit sale {} recorded", credit.sale.sale_number);

        let report = db.sales().report(None, None, None).await?;
        println!(
            "  Report: {} total, {} cash, {} credit",
            report.total_sales.len(),
            report.sales_paid_in_cash.len(),
            report.sales_paid_in_credit.len()
        );
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
