//! Certification Discovery Binary
//!
//! Discovers new free certifications from known sources and web search,
//! deduplicated against the current dataset, and writes the discoveries
//! report for review.

use anyhow::{Context, Result};
use cert_maintenance::dedup::Frontier;
use cert_maintenance::discovery::{self, DiscoveryConfig};
use cert_maintenance::fetcher::{BoundedFetcher, FetcherConfig};
use cert_maintenance::{storage, Discoveries};
use chrono::Utc;

#[tokio::main]
async fn main() -> Result<()> {
    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());

    let dataset = storage::load_dataset(&root).context("Failed to load dataset")?;
    println!("Existing certifications: {}", dataset.certifications.len());

    let mut config = DiscoveryConfig::default();
    config.sources = storage::load_sources(&root, config.sources.clone())
        .context("Failed to load sources configuration")?;

    let fetcher = BoundedFetcher::new(&FetcherConfig::default());
    let mut frontier = Frontier::from_records(&dataset.certifications);

    let new_certs = discovery::discover_all(&fetcher, &config, &mut frontier).await;

    println!(
        "\nDiscovered {} potential new certifications",
        new_certs.len()
    );

    let discoveries = Discoveries {
        discovered_at: Utc::now().to_rfc3339(),
        count: new_certs.len(),
        certifications: new_certs,
    };

    storage::save_discoveries(&root, &discoveries).context("Failed to save discoveries")?;

    println!("Discoveries saved to data/discoveries.json");
    if discoveries.count > 0 {
        println!("Markdown report saved to data/NEW_DISCOVERIES.md");
    }

    Ok(())
}
