//! Reconciler
//!
//! Merges validation survivors and accepted candidates into the next
//! canonical dataset: stable (category, name) sort, dense id
//! reassignment, recomputed metadata, and a change report naming every
//! removed and added record. Deterministic for a fixed timestamp.

use crate::types::{
    Certification, CertificationsFile, DatasetMetadata, MaintenanceReport, RecordRef,
};
use std::collections::BTreeSet;

/// Build the next dataset and its audit report.
pub fn reconcile(
    valid: Vec<Certification>,
    new_certs: Vec<Certification>,
    invalid: &[Certification],
    timestamp: &str,
) -> (CertificationsFile, MaintenanceReport) {
    let previous_count = valid.len() + invalid.len();
    let invalid_removed: Vec<RecordRef> = invalid.iter().map(RecordRef::from).collect();
    let new_added: Vec<RecordRef> = new_certs.iter().map(RecordRef::from).collect();
    let discovered_new = new_certs.len();

    let mut all = valid;
    all.extend(new_certs);

    // Stable: ties keep survivor-before-candidate order
    all.sort_by(|a, b| {
        (a.category.as_str(), a.name.as_str()).cmp(&(b.category.as_str(), b.name.as_str()))
    });
    for (index, cert) in all.iter_mut().enumerate() {
        cert.id = (index + 1) as u32;
    }

    let metadata = DatasetMetadata {
        total_certifications: all.len(),
        last_updated: timestamp.to_string(),
        categories: distinct_values(&all, |c| &c.category),
        providers: distinct_values(&all, |c| &c.provider),
        levels: distinct_values(&all, |c| &c.level),
    };

    let final_count = all.len();
    let dataset = CertificationsFile {
        metadata,
        certifications: all,
    };

    let report = MaintenanceReport {
        timestamp: timestamp.to_string(),
        previous_count,
        removed_invalid: invalid.len(),
        discovered_new,
        final_count,
        invalid_removed,
        new_added,
    };

    (dataset, report)
}

/// Sorted distinct non-empty values of one field.
fn distinct_values<F>(certifications: &[Certification], field: F) -> Vec<String>
where
    F: Fn(&Certification) -> &str,
{
    let set: BTreeSet<String> = certifications
        .iter()
        .map(|c| field(c))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    set.into_iter().collect()
}

/// Render the markdown digest of a maintenance run
/// (`MAINTENANCE_SUMMARY.md`).
pub fn render_summary(report: &MaintenanceReport) -> String {
    let mut md = String::from("# Maintenance Report\n\n");
    md.push_str(&format!("**Run:** {}\n\n", report.timestamp));
    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Previous count | {} |\n", report.previous_count));
    md.push_str(&format!("| Removed (invalid) | {} |\n", report.removed_invalid));
    md.push_str(&format!("| Added (new) | {} |\n", report.discovered_new));
    md.push_str(&format!("| Final count | {} |\n\n", report.final_count));

    if !report.invalid_removed.is_empty() {
        md.push_str("## Removed\n\n");
        for record in &report.invalid_removed {
            md.push_str(&format!("- {} ({})\n", record.name, record.url));
        }
        md.push('\n');
    }

    if !report.new_added.is_empty() {
        md.push_str("## Added\n\n");
        for record in &report.new_added {
            md.push_str(&format!("- {} ({})\n", record.name, record.url));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, name: &str, url: &str) -> Certification {
        Certification {
            id: 0,
            category: category.to_string(),
            name: name.to_string(),
            provider: "Provider".to_string(),
            url: url.to_string(),
            description: String::new(),
            duration: "Self-paced".to_string(),
            level: "Beginner".to_string(),
            prerequisites: String::new(),
            expiration: String::new(),
            discovered_at: None,
            validated: None,
            last_checked: None,
        }
    }

    #[test]
    fn test_sort_and_id_assignment() {
        let valid = vec![
            record("Security", "Zeta Cert", "https://a.com/z"),
            record("Cloud", "Beta Cert", "https://a.com/b"),
        ];
        let new_certs = vec![record("Cloud", "Alpha Cert", "https://a.com/a")];

        let (dataset, _) = reconcile(valid, new_certs, &[], "2026-01-01T00:00:00Z");

        let names: Vec<&str> = dataset
            .certifications
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha Cert", "Beta Cert", "Zeta Cert"]);

        let ids: Vec<u32> = dataset.certifications.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(dataset.metadata.total_certifications, 3);
    }

    #[test]
    fn test_metadata_is_sorted_distinct_non_empty() {
        let mut a = record("Security", "A Cert Name", "https://a.com/a");
        a.provider = "Zed".to_string();
        let mut b = record("Cloud", "B Cert Name", "https://a.com/b");
        b.provider = "Acme".to_string();
        let mut c = record("Cloud", "C Cert Name", "https://a.com/c");
        c.provider = String::new();
        c.level = String::new();

        let (dataset, _) = reconcile(vec![a, b, c], vec![], &[], "2026-01-01T00:00:00Z");

        assert_eq!(dataset.metadata.categories, vec!["Cloud", "Security"]);
        assert_eq!(dataset.metadata.providers, vec!["Acme", "Zed"]);
        assert_eq!(dataset.metadata.levels, vec!["Beginner"]);
    }

    #[test]
    fn test_report_names_every_change() {
        let valid = vec![record("Cloud", "Kept Cert", "https://a.com/kept")];
        let new_certs = vec![record("Cloud", "Added Cert", "https://a.com/new")];
        let invalid = vec![record("Cloud", "Gone Cert", "https://a.com/gone")];

        let (_, report) = reconcile(valid, new_certs, &invalid, "2026-01-01T00:00:00Z");

        assert_eq!(report.previous_count, 2);
        assert_eq!(report.removed_invalid, 1);
        assert_eq!(report.discovered_new, 1);
        assert_eq!(report.final_count, 2);
        assert_eq!(report.invalid_removed[0].name, "Gone Cert");
        assert_eq!(report.new_added[0].url, "https://a.com/new");
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let valid = vec![
            record("Security", "Network Defense", "https://a.com/nd"),
            record("Cloud", "Cloud Basics", "https://a.com/cb"),
            record("Cloud", "Advanced Cloud", "https://a.com/ac"),
        ];
        let timestamp = "2026-01-01T00:00:00Z";

        let (first, _) = reconcile(valid, vec![], &[], timestamp);
        let (second, _) = reconcile(first.certifications.clone(), vec![], &[], timestamp);

        let first_json = serde_json::to_string_pretty(&first).unwrap();
        let second_json = serde_json::to_string_pretty(&second).unwrap();
        assert_eq!(first_json, second_json);
    }

    #[test]
    fn test_stable_sort_breaks_ties_by_input_order() {
        // Same (category, name) pair: survivor stays ahead of candidate
        let survivor = record("Cloud", "Same Name Cert", "https://a.com/1");
        let candidate = record("Cloud", "Same Name Cert", "https://a.com/2");

        let (dataset, _) = reconcile(vec![survivor], vec![candidate], &[], "t");
        assert_eq!(dataset.certifications[0].url, "https://a.com/1");
        assert_eq!(dataset.certifications[1].url, "https://a.com/2");
    }

    #[test]
    fn test_render_summary_lists_changes() {
        let invalid = vec![record("Cloud", "Dead Cert", "https://a.com/dead")];
        let (_, report) = reconcile(
            vec![record("Cloud", "Live Cert", "https://a.com/live")],
            vec![],
            &invalid,
            "2026-01-01T00:00:00Z",
        );

        let md = render_summary(&report);
        assert!(md.contains("| Removed (invalid) | 1 |"));
        assert!(md.contains("- Dead Cert (https://a.com/dead)"));
    }
}
