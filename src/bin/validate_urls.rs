//! URL Validation Binary
//!
//! Validates every certification URL and writes the validation report.
//! Exits non-zero when more than 20% of URLs are invalid, so CI can gate
//! on dataset health.

use anyhow::{Context, Result};
use cert_maintenance::fetcher::{BoundedFetcher, FetcherConfig};
use cert_maintenance::validator::{build_report, meets_threshold, UrlValidator};
use cert_maintenance::{storage, Certification};

#[tokio::main]
async fn main() -> Result<()> {
    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());

    // Prefer the JSON dataset, fall back to the CSV mirror
    let dataset = storage::load_dataset(&root).context("Failed to load dataset")?;
    let mut certifications = dataset.certifications;

    if certifications.is_empty() {
        certifications = storage::read_csv(&root)
            .context("Failed to read CSV")?
            .into_iter()
            .map(Certification::from)
            .collect();
    }

    if certifications.is_empty() {
        eprintln!("No certifications found to validate");
        std::process::exit(1);
    }

    println!("Validating {} URLs...", certifications.len());

    let fetcher = BoundedFetcher::new(&FetcherConfig::validator());
    let outcome = UrlValidator::new(fetcher).validate(certifications).await;

    let report = build_report(outcome.results);
    storage::save_validation_report(&root, &report)
        .context("Failed to save validation report")?;

    println!("\nValidation Complete!");
    println!(
        "Valid: {}/{} ({}%)",
        report.summary.valid, report.summary.total_checked, report.summary.valid_percentage
    );
    println!("Invalid: {}", report.summary.invalid);

    if !meets_threshold(&report) {
        println!("\nWarning: More than 20% of URLs are invalid!");
        std::process::exit(1);
    }

    Ok(())
}
