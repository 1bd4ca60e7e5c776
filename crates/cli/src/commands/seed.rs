//! Seed the content platform with demo products.
//!
//! Uses `createIfNotExists`, so re-running the command is harmless: already
//! seeded products keep any editorial changes made since.

use velour_storefront::config::ContentConfig;
use velour_storefront::content::{ContentClient, ContentError};

/// Errors from the seed command.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] velour_storefront::config::ConfigError),

    #[error("Content platform error: {0}")]
    Content(#[from] ContentError),
}

/// Upsert the demo catalog.
///
/// # Errors
///
/// Returns `SeedError` if configuration is missing or the platform rejects
/// the mutation.
pub async fn run() -> Result<(), SeedError> {
    let config = ContentConfig::from_env()?;
    let client = ContentClient::new(&config);

    let products = demo_products();
    let count = products.len();

    tracing::info!(count, "Seeding demo products...");
    client.upsert_documents(products).await?;
    tracing::info!("Seed complete!");

    Ok(())
}

fn demo_products() -> Vec<serde_json::Value> {
    let catalog: [(&str, &str, &str, f64, bool, &str); 6] = [
        ("oud-royale", "Oud Royale", "men", 189.00, true, "woody"),
        ("vetiver-noir", "Vetiver Noir", "men", 129.00, false, "green"),
        ("cedre-sauvage", "Cèdre Sauvage", "men", 119.00, false, "woody"),
        ("rose-de-minuit", "Rose de Minuit", "women", 159.00, true, "floral"),
        ("ambre-soyeux", "Ambre Soyeux", "women", 139.00, false, "oriental"),
        ("fleur-d-hiver", "Fleur d'Hiver", "women", 109.00, false, "floral"),
    ];

    catalog
        .into_iter()
        .map(|(slug, name, gender, price, bestseller, category)| {
            serde_json::json!({
                "_id": format!("product-{slug}"),
                "_type": "product",
                "name": name,
                "slug": { "_type": "slug", "current": slug },
                "gender": gender,
                "price": price,
                "description": format!("{name} eau de parfum, 50ml."),
                "bestseller": bestseller,
                "category": category,
                "inStock": true,
            })
        })
        .collect()
}
