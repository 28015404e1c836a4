use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;

use farm_market_client::catalog::{CategoryFilter, ListingQuery, SortMode};
use farm_market_client::client::{ApiClient, Session};
use farm_market_client::config::ClientConfig;
use farm_market_client::services::BuyerService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    dotenv::dotenv().ok();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "configs/client.toml".to_string());
    let config = ClientConfig::load(Some(&config_path))?;

    println!("Analyzing catalog at {}...\n", config.base_url());

    let api = ApiClient::from_config(&config, Session::new())?;
    let products = BuyerService::new(api)
        .home()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))
        .context("Failed to fetch the buyer home listing")?;

    println!("Total products: {}", products.len());

    let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
    for product in &products {
        *per_category.entry(product.category_name()).or_default() += 1;
    }

    println!("\n=== PER CATEGORY ===");
    for (name, count) in &per_category {
        println!("{:<12} {}", name, count);
    }

    let undated = products.iter().filter(|p| p.created_at.is_none()).count();
    let without_image = products.iter().filter(|p| p.display_image().is_none()).count();
    let out_of_stock = products.iter().filter(|p| p.quantity == 0).count();

    println!("\n=== DATA QUALITY ===");
    println!("Without created_at: {}", undated);
    println!("Without image:      {}", without_image);
    println!("Out of stock:       {}", out_of_stock);

    for sort in [SortMode::PriceAsc, SortMode::PriceDesc, SortMode::DateDesc, SortMode::DateAsc] {
        let view = ListingQuery::new(CategoryFilter::All, "", sort).apply(&products);
        println!("\n=== {} ===", sort.label().to_uppercase());
        for product in view.iter().take(3) {
            let listed = product
                .created_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "undated".to_string());
            println!("  {:>6}  {:<28} {:>9.2}  {}", product.id, product.name, product.price, listed);
        }
        if view.len() > 3 {
            println!("  ... and {} more", view.len() - 3);
        }
    }

    Ok(())
}
