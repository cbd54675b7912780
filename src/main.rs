//! Automated Maintenance Pipeline
//!
//! Runs without human intervention:
//! - validates all existing certification URLs
//! - discovers new free certifications from sources and web search
//! - removes invalid entries, adds validated new ones
//! - rewrites the dataset, CSV mirror, and maintenance report

use anyhow::{Context, Result};
use cert_maintenance::dedup::Frontier;
use cert_maintenance::discovery::{self, DiscoveryConfig};
use cert_maintenance::fetcher::{BoundedFetcher, FetcherConfig};
use cert_maintenance::validator::{truncate, UrlValidator};
use cert_maintenance::{reconcile, storage};
use chrono::Utc;

fn banner(title: &str) {
    println!("\n{}", "=".repeat(50));
    println!("{}", title);
    println!("{}", "=".repeat(50));
}

#[tokio::main]
async fn main() -> Result<()> {
    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());
    let timestamp = Utc::now().to_rfc3339();

    let dataset =
        storage::load_dataset(&root).context("Failed to load certification dataset")?;
    let current_certs = dataset.certifications;
    println!("Current certifications: {}", current_certs.len());

    let fetcher = BoundedFetcher::new(&FetcherConfig::default());

    // Phase 1: validate existing certifications
    banner("PHASE 1: Validating existing certifications");
    println!("Validating {} URLs...", current_certs.len());

    let validator = UrlValidator::new(fetcher.clone());
    let outcome = validator.validate(current_certs).await;

    println!("\nValid: {}", outcome.valid.len());
    println!("Invalid (will be removed): {}", outcome.invalid.len());

    if !outcome.invalid.is_empty() {
        println!("\nRemoving invalid certifications:");
        for cert in outcome.invalid.iter().take(10) {
            println!("  - {}", truncate(&cert.name, 50));
        }
        if outcome.invalid.len() > 10 {
            println!("  ... and {} more", outcome.invalid.len() - 10);
        }
    }

    // Phase 2: discover new certifications
    banner("PHASE 2: Discovering new certifications");

    let mut config = DiscoveryConfig::default();
    config.sources = storage::load_sources(&root, config.sources.clone())
        .context("Failed to load sources configuration")?;

    let mut frontier = Frontier::from_records(&outcome.valid);
    let new_certs = discovery::discover_all(&fetcher, &config, &mut frontier).await;

    // Phase 3: merge and save
    banner("PHASE 3: Updating database");

    let (next_dataset, report) =
        reconcile::reconcile(outcome.valid, new_certs, &outcome.invalid, &timestamp);

    storage::save_dataset(&root, &next_dataset).context("Failed to save dataset")?;
    storage::write_csv(&root, &next_dataset.certifications).context("Failed to save CSV")?;
    storage::save_maintenance_report(&root, &report)
        .context("Failed to save maintenance report")?;

    banner("SUMMARY");
    println!("Previous count:    {}", report.previous_count);
    println!("Removed (invalid): {}", report.removed_invalid);
    println!("Added (new):       {}", report.discovered_new);
    println!("Final count:       {}", report.final_count);
    println!("\nData saved to:");
    println!("  - data/certifications.json");
    println!("  - free_certifications.csv");
    println!("  - data/maintenance_report.json");

    if report.removed_invalid > 0 || report.discovered_new > 0 {
        println!("\n[CHANGES DETECTED] - Will commit updates");
    } else {
        println!("\n[NO CHANGES] - Database is up to date");
    }

    Ok(())
}
