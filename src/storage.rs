//! Storage
//!
//! Persistence for the canonical dataset, its tabular mirror, the
//! optional sources override, and the per-run audit reports.
//!
//! A missing dataset file means an empty dataset (first run). A file
//! that exists but cannot be parsed is fatal: without a safe baseline
//! the run must stop rather than overwrite state.

use crate::types::{
    Certification, CertificationsFile, CsvRecord, Discoveries, FixReport, MaintenanceReport,
    Source, Sources, ValidationReport,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const DATASET_FILE: &str = "data/certifications.json";
const CSV_FILE: &str = "free_certifications.csv";
const SOURCES_FILE: &str = "sources.yml";

pub fn load_dataset(root: &str) -> Result<CertificationsFile> {
    let path = PathBuf::from(root).join(DATASET_FILE);

    if !path.exists() {
        return Ok(CertificationsFile::empty());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read dataset from {:?}", path))?;

    let dataset: CertificationsFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset at {:?}", path))?;

    Ok(dataset)
}

pub fn save_dataset(root: &str, dataset: &CertificationsFile) -> Result<()> {
    let path = PathBuf::from(root).join(DATASET_FILE);
    ensure_parent(&path)?;

    let json = serde_json::to_string_pretty(dataset)?;
    fs::write(&path, json).with_context(|| format!("Failed to write dataset to {:?}", path))?;
    Ok(())
}

/// Read the tabular mirror. A missing file is an empty row set.
pub fn read_csv(root: &str) -> Result<Vec<CsvRecord>> {
    let path = PathBuf::from(root).join(CSV_FILE);

    if !path.exists() {
        return Ok(vec![]);
    }

    let mut reader = csv::Reader::from_path(&path)
        .with_context(|| format!("Failed to open CSV from {:?}", path))?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRecord = result.context("Failed to parse CSV row")?;
        rows.push(row);
    }

    Ok(rows)
}

/// Write the tabular mirror with the same record order as the JSON
/// document.
pub fn write_csv(root: &str, certifications: &[Certification]) -> Result<()> {
    let path = PathBuf::from(root).join(CSV_FILE);
    ensure_parent(&path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("Failed to open CSV for writing at {:?}", path))?;

    // Header row even when the dataset is empty
    writer
        .write_record([
            "Category",
            "Certification_Name",
            "Provider",
            "URL",
            "Description",
            "Duration",
            "Level",
            "Prerequisites",
            "Expiration",
        ])
        .context("Failed to write CSV header")?;

    for cert in certifications {
        writer
            .serialize(CsvRecord::from(cert))
            .context("Failed to write CSV row")?;
    }

    writer.flush().context("Failed to flush CSV")?;
    Ok(())
}

/// Load the source descriptors, preferring a `sources.yml` override when
/// one is present.
pub fn load_sources(root: &str, defaults: Vec<Source>) -> Result<Vec<Source>> {
    let path = PathBuf::from(root).join(SOURCES_FILE);

    if !path.exists() {
        return Ok(defaults);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read sources from {:?}", path))?;

    let sources: Sources =
        serde_yaml::from_str(&content).with_context(|| "Failed to parse sources YAML")?;

    Ok(sources.sources)
}

pub fn save_validation_report(root: &str, report: &ValidationReport) -> Result<()> {
    write_json(root, "data/validation_report.json", report)?;
    write_text(
        root,
        "data/VALIDATION_STATUS.md",
        &crate::validator::render_markdown(report),
    )
}

pub fn load_validation_report(root: &str) -> Result<ValidationReport> {
    let path = PathBuf::from(root).join("data/validation_report.json");
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read validation report from {:?}", path))?;
    serde_json::from_str(&content).context("Failed to parse validation report")
}

pub fn save_maintenance_report(root: &str, report: &MaintenanceReport) -> Result<()> {
    write_json(root, "data/maintenance_report.json", report)?;
    write_text(
        root,
        "data/MAINTENANCE_SUMMARY.md",
        &crate::reconcile::render_summary(report),
    )
}

pub fn save_discoveries(root: &str, discoveries: &Discoveries) -> Result<()> {
    write_json(root, "data/discoveries.json", discoveries)?;
    if discoveries.count > 0 {
        write_text(
            root,
            "data/NEW_DISCOVERIES.md",
            &crate::discovery::render_discoveries(discoveries),
        )?;
    }
    Ok(())
}

pub fn save_fix_report(root: &str, report: &FixReport) -> Result<()> {
    write_json(root, "data/url_fixes.json", report)
}

fn write_json<T: serde::Serialize>(root: &str, relative: &str, value: &T) -> Result<()> {
    let path = PathBuf::from(root).join(relative);
    ensure_parent(&path)?;
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&path, json).with_context(|| format!("Failed to write report to {:?}", path))?;
    Ok(())
}

fn write_text(root: &str, relative: &str, content: &str) -> Result<()> {
    let path = PathBuf::from(root).join(relative);
    ensure_parent(&path)?;
    fs::write(&path, content).with_context(|| format!("Failed to write report to {:?}", path))?;
    Ok(())
}

fn ensure_parent(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    Ok(())
}
