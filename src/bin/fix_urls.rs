//! URL Repair Binary
//!
//! Reads the latest validation report and tries to find replacements for
//! every broken URL. Fixed records keep their place in the dataset;
//! records with no working replacement are removed. Both the dataset and
//! the CSV mirror are rewritten so the two stay consistent.

use anyhow::{Context, Result};
use cert_maintenance::fetcher::{BoundedFetcher, FetcherConfig};
use cert_maintenance::repair::{self, RepairConfig};
use cert_maintenance::{reconcile, storage};
use chrono::Utc;
use std::collections::HashSet;

#[tokio::main]
async fn main() -> Result<()> {
    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());
    let timestamp = Utc::now().to_rfc3339();

    let report = storage::load_validation_report(&root)
        .context("Failed to load validation report (run validate-urls first)")?;
    let invalid_urls: HashSet<String> = report
        .invalid_urls
        .iter()
        .map(|r| r.url.clone())
        .collect();

    let dataset = storage::load_dataset(&root).context("Failed to load dataset")?;
    let previous_count = dataset.certifications.len();

    let fetcher = BoundedFetcher::new(&FetcherConfig::default());
    let config = RepairConfig::default();

    let (kept, fix_report) =
        repair::repair_dataset(&fetcher, &config, dataset.certifications, &invalid_urls).await;

    println!("\n--- Summary ---");
    println!("Fixed: {}", fix_report.summary.fixed);
    println!("To remove: {}", fix_report.summary.removed);

    let (next_dataset, _) = reconcile::reconcile(kept, vec![], &[], &timestamp);
    storage::save_dataset(&root, &next_dataset).context("Failed to save dataset")?;
    storage::write_csv(&root, &next_dataset.certifications).context("Failed to save CSV")?;
    storage::save_fix_report(&root, &fix_report).context("Failed to save fix report")?;

    println!(
        "\nUpdated dataset: {} certifications (removed {})",
        next_dataset.certifications.len(),
        previous_count - next_dataset.certifications.len()
    );

    Ok(())
}
