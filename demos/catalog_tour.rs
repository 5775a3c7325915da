//! Catalog tour
//!
//! Walks a few catalog calls end to end. Needs `REBRICK_API_KEY` (or a
//! `config/local.toml`); a `.env` file is picked up as well.
//!
//! ```text
//! REBRICK_API_KEY=... cargo run --example catalog_tour -- 6090
//! ```

use anyhow::Context;
use tracing::info;

use rebrick::api::ElementDetails;
use rebrick::{Rebrick, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rebrick=info".parse()?)
                .add_directive("catalog_tour=info".parse()?),
        )
        .json()
        .init();

    let settings = Settings::load().context("Failed to load configuration")?;
    let client = Rebrick::new(settings)?;

    let set_id = std::env::args().nth(1).unwrap_or_else(|| "6090".to_string());

    let set = client
        .get_set(&set_id)
        .await?
        .with_context(|| format!("Set {} not found", set_id))?;
    info!(set = %set, pieces = set.pieces, year = set.year, "Set");

    if let Some(themes) = client.get_set_themes(&set_id).await? {
        let path: Vec<&str> = themes.iter().map(|t| t.name.as_str()).collect();
        info!(themes = %path.join(" > "), "Theme hierarchy");
    }

    if let Some(elements) = client.get_set_elements(&set_id, ElementDetails::default()).await? {
        for element in elements.iter().take(5) {
            info!(element = %element, count = ?element.count, "Element");
        }
        info!(total = elements.len(), "Distinct elements");
    }

    if let Some(image) = client.get_set_image(&set_id).await? {
        info!(bytes = image.len(), "Downloaded set image");
    }

    Ok(())
}
