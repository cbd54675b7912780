use serde::{Deserialize, Serialize};
use std::fmt;

/// A single certification listing in the canonical dataset.
///
/// `id` is a dense 1..N sequence reassigned on every reconciliation run;
/// it carries no meaning across runs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Certification {
    #[serde(default)]
    pub id: u32,
    pub category: String,
    pub name: String,
    pub provider: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub prerequisites: String,
    #[serde(default)]
    pub expiration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
}

/// Derived metadata recomputed on every reconciliation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatasetMetadata {
    pub total_certifications: usize,
    pub last_updated: String,
    pub categories: Vec<String>,
    pub providers: Vec<String>,
    pub levels: Vec<String>,
}

/// The persisted dataset document: metadata plus the sorted listing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CertificationsFile {
    pub metadata: DatasetMetadata,
    pub certifications: Vec<Certification>,
}

impl CertificationsFile {
    pub fn empty() -> Self {
        Self {
            metadata: DatasetMetadata {
                total_certifications: 0,
                last_updated: String::new(),
                categories: vec![],
                providers: vec![],
                levels: vec![],
            },
            certifications: vec![],
        }
    }
}

/// A scrapeable certification source page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    pub category: String,
    #[serde(default)]
    pub provider: String,
    /// CSS selector for candidate anchors; every `a[href]` when absent.
    #[serde(default)]
    pub links: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Sources {
    pub sources: Vec<Source>,
}

/// Why a probe failed to reach a URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum UnreachableKind {
    HttpStatus,
    Timeout,
    Connect,
    Tls,
    TooManyRedirects,
    InvalidUrl,
    Other,
}

impl fmt::Display for UnreachableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnreachableKind::HttpStatus => "HTTP error",
            UnreachableKind::Timeout => "Timeout",
            UnreachableKind::Connect => "Connection error",
            UnreachableKind::Tls => "TLS error",
            UnreachableKind::TooManyRedirects => "Too many redirects",
            UnreachableKind::InvalidUrl => "Invalid URL",
            UnreachableKind::Other => "Request failed",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of a single reachability probe. Transport failures are data,
/// not errors: a probe never propagates an `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Reachable { status: u16 },
    Unreachable { status: Option<u16>, reason: UnreachableKind },
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProbeOutcome::Reachable { status } => Some(*status),
            ProbeOutcome::Unreachable { status, .. } => *status,
        }
    }
}

/// Per-URL validation record, persisted only inside the validation report.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationResult {
    pub url: String,
    pub name: String,
    pub status: Option<u16>,
    pub valid: bool,
    pub error: Option<String>,
    pub checked_at: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationSummary {
    pub total_checked: usize,
    pub valid: usize,
    pub invalid: usize,
    pub valid_percentage: f64,
    pub generated_at: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationReport {
    pub summary: ValidationSummary,
    pub invalid_urls: Vec<ValidationResult>,
    pub all_results: Vec<ValidationResult>,
}

/// Name + url of a record named in an audit artifact.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecordRef {
    pub name: String,
    pub url: String,
}

impl From<&Certification> for RecordRef {
    fn from(cert: &Certification) -> Self {
        Self {
            name: cert.name.clone(),
            url: cert.url.clone(),
        }
    }
}

/// Audit report produced by every reconciliation run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MaintenanceReport {
    pub timestamp: String,
    pub previous_count: usize,
    pub removed_invalid: usize,
    pub discovered_new: usize,
    pub final_count: usize,
    pub invalid_removed: Vec<RecordRef>,
    pub new_added: Vec<RecordRef>,
}

/// Standalone discovery output (`discoveries.json`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Discoveries {
    pub discovered_at: String,
    pub count: usize,
    pub certifications: Vec<Certification>,
}

/// A single repaired URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UrlFix {
    pub name: String,
    pub old_url: String,
    pub new_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FixSummary {
    pub fixed: usize,
    pub removed: usize,
    pub remaining: usize,
}

/// Audit report produced by the URL repair pass.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FixReport {
    pub fixes: Vec<UrlFix>,
    pub removals: Vec<RecordRef>,
    pub summary: FixSummary,
}

/// One row of the tabular mirror (`free_certifications.csv`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CsvRecord {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Certification_Name")]
    pub name: String,
    #[serde(rename = "Provider")]
    pub provider: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Duration", default)]
    pub duration: String,
    #[serde(rename = "Level", default)]
    pub level: String,
    #[serde(rename = "Prerequisites", default)]
    pub prerequisites: String,
    #[serde(rename = "Expiration", default)]
    pub expiration: String,
}

impl From<&Certification> for CsvRecord {
    fn from(cert: &Certification) -> Self {
        Self {
            category: cert.category.clone(),
            name: cert.name.clone(),
            provider: cert.provider.clone(),
            url: cert.url.clone(),
            description: cert.description.clone(),
            duration: cert.duration.clone(),
            level: cert.level.clone(),
            prerequisites: cert.prerequisites.clone(),
            expiration: cert.expiration.clone(),
        }
    }
}

impl From<CsvRecord> for Certification {
    fn from(row: CsvRecord) -> Self {
        Self {
            id: 0,
            category: row.category,
            name: row.name,
            provider: row.provider,
            url: row.url,
            description: row.description,
            duration: row.duration,
            level: row.level,
            prerequisites: row.prerequisites,
            expiration: row.expiration,
            discovered_at: None,
            validated: None,
            last_checked: None,
        }
    }
}
