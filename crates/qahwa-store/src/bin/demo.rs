//! # Demo Walkthrough
//!
//! Seeds the in-memory store with the demo café and runs one full ordering
//! session: browse the menu, fill a cart, redeem a reward, place a pickup
//! order, and walk it through the kitchen.
//!
//! ## Usage
//! ```bash
//! # English session (default)
//! cargo run -p qahwa-store --bin demo
//!
//! # Arabic menu and receipt
//! cargo run -p qahwa-store --bin demo -- --lang ar
//!
//! # Load settings from a TOML file first
//! cargo run -p qahwa-store --bin demo -- --config ./store.toml
//! ```
//!
//! Set `RUST_LOG` to see the store's own logging alongside the receipt,
//! e.g. `RUST_LOG=qahwa_store=debug`.

use std::env;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use qahwa_core::{GeoPoint, Lang, Money, OrderStatus, OrderType};
use qahwa_store::repository::cart::AddToCart;
use qahwa_store::repository::order::OrderRequest;
use qahwa_store::{Store, StoreConfig};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qahwa_store=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut lang = Lang::En;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--lang" | "-l" => {
                if i + 1 < args.len() {
                    lang = match args[i + 1].as_str() {
                        "ar" => Lang::Ar,
                        _ => Lang::En,
                    };
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Qahwa Demo Walkthrough");
                println!();
                println!("Usage: demo [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -l, --lang <en|ar>    Menu and receipt language (default: en)");
                println!("  -c, --config <PATH>   Load store settings from a TOML file");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = StoreConfig::load_or_default(config_path);
    config.seed.demo_data = true;
    let store = Store::new(config)?;

    println!("☕ {} Demo Walkthrough", store.config().cafe.name);
    println!("==========================");
    println!();

    // ----- Menu -----
    println!("Menu ({lang}):");
    for product in store.products().list(&Default::default()) {
        println!("  {:>9}  {}", product.price().to_string(), product.name.get(lang));
    }
    println!();

    // ----- Customer -----
    let user = store
        .users()
        .get_by_phone("0501234567")
        .ok_or("seeded customer missing")?;
    println!("Customer: {} ({} points)", user.name, user.loyalty_points);
    println!();

    // ----- Cart -----
    for (product_id, quantity) in [("prod_latte", 2), ("prod_croissant", 1)] {
        let item = store.carts().add_item(
            &user.id,
            AddToCart {
                product_id: product_id.to_string(),
                quantity,
                customization: None,
            },
        )?;
        println!("✓ Added {} × {}", item.quantity, item.name.get(lang));
    }

    let summary = store.carts().summary(&user.id)?;
    println!("  Subtotal: {}", summary.subtotal());
    println!();

    // ----- Rewards -----
    println!("Available rewards:");
    let available = store.rewards().available(&user.id)?;
    for reward in &available {
        println!(
            "  {:>4} pts  {}",
            reward.points_required,
            reward.name.get(lang)
        );
    }

    let applied = store.rewards().apply(&user.id, "rwd_discount10")?;
    println!(
        "✓ Applied {} for {} points",
        applied.name.get(lang),
        applied.points_used
    );
    println!();

    // ----- Receipt -----
    let summary = store.carts().summary(&user.id)?;
    println!("Receipt:");
    for item in &summary.items {
        println!(
            "  {} × {:<24} {:>9}",
            item.quantity,
            item.name.get(lang),
            item.line_total().to_string()
        );
    }
    println!("  {:<28} {:>9}", "Subtotal", summary.subtotal().to_string());
    println!(
        "  {:<28} -{:>8}",
        "Discounts",
        Money::from_halalas(summary.total_discounts_halalas).to_string()
    );
    println!("  {:<28} {:>9}", "Total", summary.final_total().to_string());
    println!();

    // ----- Order -----
    let order = store.orders().place(
        &user.id,
        OrderRequest {
            order_type: OrderType::Pickup,
            preferred_branch_id: None,
            customer_location: Some(GeoPoint {
                latitude: 24.7000,
                longitude: 46.6900,
            }),
            payment_method: Some("card".to_string()),
        },
    )?;
    println!("✓ Order {} placed", order.id);
    println!("  Branch:   {}", order.branch_name.get(lang));
    println!("  Total:    {}", order.total());
    println!("  Ready in: ~{} minutes", order.estimated_minutes);
    println!();

    // ----- Kitchen -----
    let order = store.orders().update_status(&order.id, OrderStatus::Preparing)?;
    println!("✓ Kitchen started ({})", order.status);
    let order = store.orders().update_status(&order.id, OrderStatus::Ready)?;
    println!("✓ Order is {} for pickup", order.status);
    println!(
        "  Queue at {}: {} order(s)",
        order.branch_name.get(lang),
        store.orders().queue_depth(&order.branch_id)
    );

    let user = store
        .users()
        .get(&user.id)
        .ok_or("customer vanished mid-session")?;
    println!("  {} now has {} points", user.name, user.loyalty_points);
    println!();

    println!("Order record:");
    println!("{}", serde_json::to_string_pretty(&order)?);

    println!();
    println!("✓ Walkthrough complete!");

    Ok(())
}
