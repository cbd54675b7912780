//! Raw Data Cleaning
//!
//! Normalizes raw tabular input into dataset records: URL scheme repair,
//! level vocabulary normalization, URL-exact deduplication, and the drop
//! of rows missing essential fields.

use crate::types::{Certification, CsvRecord};
use std::collections::HashSet;

/// Clean and validate a URL: trim and prepend `https://` when the scheme
/// is missing.
pub fn clean_url(url: &str) -> String {
    let url = url.trim();
    if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{}", url)
    } else {
        url.to_string()
    }
}

pub fn clean_category(category: &str) -> String {
    category.trim().to_string()
}

/// Normalize a certification level into the fixed vocabulary. Unknown
/// levels are title-cased and passed through; empty means "Not Specified".
pub fn normalize_level(level: &str) -> String {
    let lowered = level.trim().to_lowercase();
    match lowered.as_str() {
        "beginner" => "Beginner".to_string(),
        "beginner-intermediate" => "Beginner-Intermediate".to_string(),
        "intermediate" => "Intermediate".to_string(),
        "intermediate-advanced" => "Intermediate-Advanced".to_string(),
        "advanced" => "Advanced".to_string(),
        "associate" => "Associate".to_string(),
        "professional" => "Professional".to_string(),
        "expert" => "Expert".to_string(),
        "" => "Not Specified".to_string(),
        other => title_case(other),
    }
}

/// Title-case a label: uppercase the first letter of every alphabetic run.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut boundary = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            boundary = false;
        } else {
            out.push(ch);
            boundary = true;
        }
    }
    out
}

/// Clean raw CSV rows into sorted, re-identified records. Returns the
/// records plus the number of URL-duplicate rows removed.
pub fn clean_rows(rows: Vec<CsvRecord>) -> (Vec<Certification>, usize) {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut duplicates = 0;
    let mut certifications = Vec::new();

    for row in rows {
        let url = clean_url(&row.url);
        if !seen_urls.insert(url.clone()) {
            duplicates += 1;
            continue;
        }

        let cert = Certification {
            id: 0,
            category: clean_category(&row.category),
            name: row.name.trim().to_string(),
            provider: row.provider.trim().to_string(),
            url,
            description: row.description.trim().to_string(),
            duration: row.duration.trim().to_string(),
            level: normalize_level(&row.level),
            prerequisites: row.prerequisites.trim().to_string(),
            expiration: row.expiration.trim().to_string(),
            discovered_at: None,
            validated: None,
            last_checked: None,
        };

        // Essential fields only
        if cert.name.is_empty() || cert.url.is_empty() {
            continue;
        }

        certifications.push(cert);
    }

    certifications.sort_by(|a, b| {
        (a.category.as_str(), a.name.as_str()).cmp(&(b.category.as_str(), b.name.as_str()))
    });
    for (index, cert) in certifications.iter_mut().enumerate() {
        cert.id = (index + 1) as u32;
    }

    (certifications, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, url: &str) -> CsvRecord {
        CsvRecord {
            category: "Cloud Computing".to_string(),
            name: name.to_string(),
            url: url.to_string(),
            ..CsvRecord::default()
        }
    }

    #[test]
    fn test_clean_url_prepends_scheme() {
        assert_eq!(clean_url("example.com/cert"), "https://example.com/cert");
        assert_eq!(clean_url(" https://example.com "), "https://example.com");
        assert_eq!(clean_url("http://example.com"), "http://example.com");
        assert_eq!(clean_url(""), "");
    }

    #[test]
    fn test_normalize_level_vocabulary() {
        assert_eq!(normalize_level("beginner"), "Beginner");
        assert_eq!(normalize_level("  Intermediate-Advanced "), "Intermediate-Advanced");
        assert_eq!(normalize_level("PROFESSIONAL"), "Professional");
        assert_eq!(normalize_level(""), "Not Specified");
        assert_eq!(normalize_level("very hard"), "Very Hard");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("freecodecamp"), "Freecodecamp");
        assert_eq!(title_case("my-site"), "My-Site");
    }

    #[test]
    fn test_clean_rows_dedups_and_drops_incomplete() {
        let rows = vec![
            row("Cloud Intro", "example.com/a"),
            row("Cloud Intro Again", "https://example.com/a"),
            row("", "https://example.com/b"),
            row("Zeta Course", "https://example.com/z"),
        ];

        let (certs, duplicates) = clean_rows(rows);
        assert_eq!(duplicates, 1);
        let names: Vec<&str> = certs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cloud Intro", "Zeta Course"]);
        assert_eq!(certs[0].id, 1);
        assert_eq!(certs[1].id, 2);
    }
}
