//! Broken URL Repair
//!
//! Attempts to recover records whose URLs went dead: a known-replacement
//! table first, then provider-specific slug variations built from the
//! record name. The first candidate that answers a probe wins; records
//! with no working replacement are dropped and named in the fix report.

use crate::fetcher::BoundedFetcher;
use crate::types::{Certification, FixReport, FixSummary, RecordRef, UrlFix};
use crate::validator::truncate;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

#[derive(Debug, Clone)]
pub struct RepairConfig {
    /// Manual old -> new replacements for known URL structure changes.
    pub known_replacements: Vec<(String, String)>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            known_replacements: [
                (
                    "https://www.coursera.org/learn/project-management-basics",
                    "https://www.coursera.org/learn/project-management",
                ),
                (
                    "https://www.coursera.org/learn/ethics-modern-world",
                    "https://www.coursera.org/learn/ethics",
                ),
                (
                    "https://www.edx.org/course/introduction-to-computer-science",
                    "https://www.edx.org/learn/computer-science",
                ),
            ]
            .iter()
            .map(|(old, new)| (old.to_string(), new.to_string()))
            .collect(),
        }
    }
}

/// Slugify a certification name for URL path reconstruction.
pub fn slugify(name: &str) -> String {
    let mut slug = name.to_lowercase().replace(' ', "-");
    slug.retain(|ch| ch != ':' && ch != '(' && ch != ')');
    if let Ok(re) = Regex::new(r"[^a-z0-9-]") {
        slug = re.replace_all(&slug, "").into_owned();
    }
    if let Ok(re) = Regex::new(r"-+") {
        slug = re.replace_all(&slug, "-").into_owned();
    }
    slug.trim_matches('-').to_string()
}

/// Candidate replacement URLs for a broken link, based on the provider
/// domain's known URL patterns.
pub fn url_variations(name: &str, old_url: &str) -> Vec<String> {
    let domain = Url::parse(old_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default();

    let slug = slugify(name);
    if slug.is_empty() {
        return vec![];
    }

    if domain.contains("coursera.org") {
        vec![
            format!("https://www.coursera.org/learn/{}", slug),
            format!("https://www.coursera.org/specializations/{}", slug),
            format!("https://www.coursera.org/professional-certificates/{}", slug),
        ]
    } else if domain.contains("edx.org") {
        vec![
            format!("https://www.edx.org/learn/{}", slug),
            format!("https://www.edx.org/course/{}", slug),
        ]
    } else if domain.contains("futurelearn.com") {
        vec![format!("https://www.futurelearn.com/courses/{}", slug)]
    } else if domain.contains("learn.microsoft.com") {
        vec![
            format!("https://learn.microsoft.com/en-us/training/paths/{}", slug),
            format!("https://learn.microsoft.com/en-us/training/modules/{}", slug),
        ]
    } else {
        vec![]
    }
}

/// Try to find a working replacement for one broken URL.
pub async fn repair_url(
    fetcher: &BoundedFetcher,
    config: &RepairConfig,
    name: &str,
    old_url: &str,
) -> Option<String> {
    if let Some((_, replacement)) = config
        .known_replacements
        .iter()
        .find(|(old, _)| old.as_str() == old_url)
    {
        if fetcher.probe(replacement).await.is_reachable() {
            return Some(replacement.clone());
        }
    }

    for candidate in url_variations(name, old_url) {
        if fetcher.probe(&candidate).await.is_reachable() {
            return Some(candidate);
        }
    }

    None
}

/// Walk the dataset, fixing or dropping every record whose URL is in the
/// invalid set. Returns the surviving records and the fix report.
pub async fn repair_dataset(
    fetcher: &BoundedFetcher,
    config: &RepairConfig,
    records: Vec<Certification>,
    invalid_urls: &HashSet<String>,
) -> (Vec<Certification>, FixReport) {
    println!("Checking {} broken URLs...", invalid_urls.len());

    let mut kept = Vec::new();
    let mut fixes = Vec::new();
    let mut removals = Vec::new();

    for mut record in records {
        if !invalid_urls.contains(&record.url) {
            kept.push(record);
            continue;
        }

        match repair_url(fetcher, config, &record.name, &record.url).await {
            Some(new_url) => {
                println!("[FIXED] {}", truncate(&record.name, 50));
                println!(
                    "        {} -> {}",
                    truncate(&record.url, 60),
                    truncate(&new_url, 60)
                );
                fixes.push(UrlFix {
                    name: record.name.clone(),
                    old_url: record.url.clone(),
                    new_url: new_url.clone(),
                });
                record.url = new_url;
                kept.push(record);
            }
            None => {
                println!(
                    "[REMOVE] {} - No replacement found",
                    truncate(&record.name, 50)
                );
                removals.push(RecordRef::from(&record));
            }
        }
    }

    let summary = FixSummary {
        fixed: fixes.len(),
        removed: removals.len(),
        remaining: kept.len(),
    };

    (
        kept,
        FixReport {
            fixes,
            removals,
            summary,
        },
    )
}
