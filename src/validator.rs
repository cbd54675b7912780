//! URL Validator
//!
//! Partitions a set of certification records into reachable and
//! unreachable by probing each record's URL, and builds the per-run
//! validation report.

use crate::fetcher::BoundedFetcher;
use crate::types::{
    Certification, ProbeOutcome, ValidationReport, ValidationResult, ValidationSummary,
};
use chrono::Utc;
use futures::future::join_all;

/// Minimum valid percentage below which the standalone validator signals
/// failure.
pub const VALID_THRESHOLD: f64 = 80.0;

pub struct UrlValidator {
    fetcher: BoundedFetcher,
}

pub struct ValidationOutcome {
    pub valid: Vec<Certification>,
    pub invalid: Vec<Certification>,
    pub results: Vec<ValidationResult>,
}

impl UrlValidator {
    pub fn new(fetcher: BoundedFetcher) -> Self {
        Self { fetcher }
    }

    /// Partition records by reachability of their URLs.
    ///
    /// Fan-out is bounded by the fetcher's gate; result i corresponds to
    /// record i regardless of completion order. Empty input yields empty
    /// partitions.
    pub async fn validate(&self, certifications: Vec<Certification>) -> ValidationOutcome {
        let checks = certifications
            .iter()
            .map(|cert| self.check(cert))
            .collect::<Vec<_>>();
        let results = join_all(checks).await;

        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for (cert, result) in certifications.into_iter().zip(results.iter()) {
            if result.valid {
                valid.push(cert);
            } else {
                invalid.push(cert);
            }
        }

        ValidationOutcome {
            valid,
            invalid,
            results,
        }
    }

    async fn check(&self, cert: &Certification) -> ValidationResult {
        let outcome = self.fetcher.probe(&cert.url).await;
        let checked_at = Utc::now().to_rfc3339();

        match outcome {
            ProbeOutcome::Reachable { status } => ValidationResult {
                url: cert.url.clone(),
                name: cert.name.clone(),
                status: Some(status),
                valid: true,
                error: None,
                checked_at,
            },
            ProbeOutcome::Unreachable { status, reason } => ValidationResult {
                url: cert.url.clone(),
                name: cert.name.clone(),
                status,
                valid: false,
                error: Some(reason.to_string()),
                checked_at,
            },
        }
    }
}

/// Aggregate per-URL results into the validation report.
pub fn build_report(results: Vec<ValidationResult>) -> ValidationReport {
    let valid_count = results.iter().filter(|r| r.valid).count();
    let invalid_count = results.len() - valid_count;

    let valid_percentage = if results.is_empty() {
        0.0
    } else {
        (valid_count as f64 / results.len() as f64 * 100.0 * 100.0).round() / 100.0
    };

    ValidationReport {
        summary: ValidationSummary {
            total_checked: results.len(),
            valid: valid_count,
            invalid: invalid_count,
            valid_percentage,
            generated_at: Utc::now().to_rfc3339(),
        },
        invalid_urls: results.iter().filter(|r| !r.valid).cloned().collect(),
        all_results: results,
    }
}

/// True iff the run's valid fraction meets the success threshold.
pub fn meets_threshold(report: &ValidationReport) -> bool {
    report.summary.valid_percentage >= VALID_THRESHOLD
}

/// Render the markdown summary (`VALIDATION_STATUS.md`).
pub fn render_markdown(report: &ValidationReport) -> String {
    let mut md = String::from("# URL Validation Report\n\n");
    md.push_str(&format!(
        "**Generated:** {}\n\n",
        report.summary.generated_at
    ));
    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Total URLs | {} |\n", report.summary.total_checked));
    md.push_str(&format!("| Valid | {} |\n", report.summary.valid));
    md.push_str(&format!("| Invalid | {} |\n", report.summary.invalid));
    md.push_str(&format!(
        "| Success Rate | {}% |\n\n",
        report.summary.valid_percentage
    ));

    if !report.invalid_urls.is_empty() {
        md.push_str(&format!(
            "## Invalid URLs ({})\n\n",
            report.invalid_urls.len()
        ));
        md.push_str("| Certification | Status | Error |\n");
        md.push_str("|---------------|--------|-------|\n");

        // Cap the table for readability
        for item in report.invalid_urls.iter().take(50) {
            let status = item
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let error = item.error.as_deref().unwrap_or("HTTP Error");
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                truncate(&item.name, 50),
                status,
                truncate(error, 30)
            ));
        }

        if report.invalid_urls.len() > 50 {
            md.push_str(&format!(
                "\n*... and {} more*\n",
                report.invalid_urls.len() - 50
            ));
        }
    }

    md
}

/// Truncate for display purposes.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        format!("{}...", text.chars().take(max_len).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str, valid: bool) -> ValidationResult {
        ValidationResult {
            url: url.to_string(),
            name: format!("Cert for {}", url),
            status: if valid { Some(200) } else { Some(404) },
            valid,
            error: if valid {
                None
            } else {
                Some("HTTP error".to_string())
            },
            checked_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn synthetic_results(total: usize, failures: usize) -> Vec<ValidationResult> {
        (0..total)
            .map(|i| result(&format!("https://example.com/{}", i), i >= failures))
            .collect()
    }

    #[test]
    fn test_empty_results_report() {
        let report = build_report(vec![]);
        assert_eq!(report.summary.total_checked, 0);
        assert_eq!(report.summary.valid_percentage, 0.0);
        assert!(!meets_threshold(&report));
    }

    #[test]
    fn test_threshold_fails_at_79_percent() {
        let report = build_report(synthetic_results(100, 21));
        assert_eq!(report.summary.valid, 79);
        assert_eq!(report.summary.valid_percentage, 79.0);
        assert!(!meets_threshold(&report));
    }

    #[test]
    fn test_threshold_passes_at_85_percent() {
        let report = build_report(synthetic_results(100, 15));
        assert_eq!(report.summary.valid, 85);
        assert_eq!(report.summary.valid_percentage, 85.0);
        assert!(meets_threshold(&report));
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        let report = build_report(synthetic_results(3, 1));
        assert_eq!(report.summary.valid_percentage, 66.67);
    }

    #[test]
    fn test_render_markdown_includes_counts() {
        let report = build_report(synthetic_results(10, 2));
        let md = render_markdown(&report);
        assert!(md.contains("| Total URLs | 10 |"));
        assert!(md.contains("| Invalid | 2 |"));
        assert!(md.contains("## Invalid URLs (2)"));
    }

    #[tokio::test]
    async fn test_validate_empty_input() {
        let fetcher = BoundedFetcher::new(&crate::fetcher::FetcherConfig::default());
        let outcome = UrlValidator::new(fetcher).validate(vec![]).await;
        assert!(outcome.valid.is_empty());
        assert!(outcome.invalid.is_empty());
        assert!(outcome.results.is_empty());
    }
}
