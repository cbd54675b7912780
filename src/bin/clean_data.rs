//! Data Cleaning Binary
//!
//! Cleans and normalizes the raw CSV data: removes URL duplicates,
//! normalizes levels and categories, drops rows missing essential
//! fields, then regenerates both the CSV mirror and the JSON dataset.

use anyhow::{Context, Result};
use cert_maintenance::{clean, reconcile, storage};
use chrono::Utc;

fn main() -> Result<()> {
    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());
    let timestamp = Utc::now().to_rfc3339();

    let rows = storage::read_csv(&root).context("Failed to read raw CSV")?;
    let (certifications, duplicates) = clean::clean_rows(rows);

    let (dataset, _) = reconcile::reconcile(certifications, vec![], &[], &timestamp);

    storage::write_csv(&root, &dataset.certifications).context("Failed to write cleaned CSV")?;
    storage::save_dataset(&root, &dataset).context("Failed to write dataset")?;

    println!("Processed {} certifications", dataset.certifications.len());
    println!("Removed {} duplicates", duplicates);
    println!("Categories: {}", dataset.metadata.categories.len());
    println!("Providers: {}", dataset.metadata.providers.len());
    println!("Output: free_certifications.csv, data/certifications.json");

    Ok(())
}
