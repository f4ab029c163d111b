//! Walk through the application stores: counter, login, products, wishlist.
//!
//! ```text
//! RUST_LOG=larder=debug cargo run --example wishlist_app -- [config.toml]
//! ```

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use larder::stores::UserProfile;
use larder::{AppConfig, AppContext};

#[tokio::main]
async fn main() -> larder::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let app = AppContext::new(&config)?;
    info!("Started");

    println!("=== Selective subscriptions ===\n");

    let count = app.counter.store().select(|s| s.count);
    let logged_in = app.auth.store().select(|s| s.is_logged_in);
    let _greeting = app.auth.store().subscribe(
        |s| s.user_profile.as_ref().map(|p| p.name.clone()),
        |name| match name {
            Some(name) => println!("   [auth] hello, {name}"),
            None => println!("   [auth] signed out"),
        },
    );
    let _wishlist = app.wishlist.store().subscribe(
        |s| s.item_ids.clone(),
        |ids| println!("   [wishlist] {} item(s): {:?}", ids.len(), ids),
    );

    println!("1. Counting");
    app.counter.increment();
    app.counter.increment();
    app.counter.decrement();
    println!(
        "   count = {}, counter view refreshed {}x, auth view refreshed {}x",
        count.get(),
        count.changes(),
        logged_in.changes()
    );

    println!("\n2. Logging in");
    if !app.auth.is_logged_in() {
        app.auth
            .login(UserProfile::new("John Doe", "john.doe@example.com").with_role("Tester"));
    }
    println!(
        "   logged in = {}, counter view refreshed {}x",
        logged_in.get(),
        count.changes()
    );

    println!("\n3. Fetching products from {}", config.api_base_url);
    app.products.fetch_products().await;
    app.products.store().read(|s| {
        if let Some(message) = s.products.error() {
            println!("   failed: {message}");
        } else if let Some(products) = s.products.data() {
            for product in products.iter().take(5) {
                println!("   #{:<3} ${:<8.2} {}", product.id, product.price, product.title);
            }
        }
    });

    println!("\n4. Building a wishlist");
    for id in [1, 3, 3, 5] {
        app.wishlist.toggle_wishlist(id);
    }
    for product in app.wishlist_products() {
        println!("   ♥ {}", product.title);
    }

    println!("\n5. Product detail");
    app.products.fetch_product_by_id("1").await;
    app.products.store().read(|s| match s.current_product.error() {
        Some(message) => println!("   failed: {message}"),
        None => {
            if let Some(product) = s.current_product.data() {
                println!(
                    "   {} ({}) rated {} by {}",
                    product.title, product.category, product.rating.rate, product.rating.count
                );
            }
        }
    });
    app.products.clear_current_product();

    println!("\n6. Logging out");
    app.auth.logout();

    println!("\n✓ Example complete!");
    Ok(())
}
