//! Discovery Engine
//!
//! Aggregates candidate certifications from two strategies:
//! - known provider catalog pages (scrape)
//! - web search result pages (search)
//!
//! Candidates pass through the frontier for deduplication as they are
//! accepted, then every survivor's URL is probed concurrently before it
//! may enter the dataset.

use crate::dedup::{normalize_url, Frontier};
use crate::fetcher::BoundedFetcher;
use crate::types::{Certification, Source};
use crate::{scrape, search};
use futures::future::join_all;
use std::collections::HashSet;
use std::time::Duration;

/// Discovery configuration: source descriptors, query lists, and the
/// classification tables. Immutable once constructed; tests substitute
/// fixtures by building their own value.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub sources: Vec<Source>,
    pub search_queries: Vec<String>,
    /// A result survives search filtering iff its title or URL contains
    /// one of these.
    pub cert_keywords: Vec<String>,
    /// Ordered domain -> provider rules; first match wins.
    pub provider_domains: Vec<(String, String)>,
    pub default_category: String,
    pub max_links_per_source: usize,
    pub max_search_results: usize,
    pub source_delay_ms: u64,
    pub query_delay_ms: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            search_queries: [
                "free IT certification 2024 2025",
                "free cloud certification AWS Azure GCP",
                "free cybersecurity certification",
                "free programming certificate online",
                "free data science certification",
                "free AI machine learning certificate",
                "free professional certification no cost",
                "free certification with badge credential",
                "vendor free certification program",
                "free tech certification exam",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            cert_keywords: ["certif", "course", "training", "learn", "badge", "credential"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            provider_domains: default_provider_domains(),
            default_category: "Programming & Development".to_string(),
            max_links_per_source: 50,
            max_search_results: 10,
            source_delay_ms: 1000,
            query_delay_ms: 2000,
        }
    }
}

fn default_provider_domains() -> Vec<(String, String)> {
    [
        ("coursera.org", "Coursera"),
        ("edx.org", "edX"),
        ("udemy.com", "Udemy"),
        ("linkedin.com", "LinkedIn Learning"),
        ("microsoft.com", "Microsoft"),
        ("google.com", "Google"),
        ("aws.amazon.com", "Amazon Web Services"),
        ("cloud.google.com", "Google Cloud"),
        ("ibm.com", "IBM"),
        ("oracle.com", "Oracle"),
        ("cisco.com", "Cisco"),
        ("salesforce.com", "Salesforce"),
        ("hubspot.com", "HubSpot"),
        ("freecodecamp.org", "freeCodeCamp"),
        ("codecademy.com", "Codecademy"),
        ("futurelearn.com", "FutureLearn"),
    ]
    .iter()
    .map(|(domain, provider)| (domain.to_string(), provider.to_string()))
    .collect()
}

fn default_sources() -> Vec<Source> {
    let table: &[(&str, &str, &str, &str, Option<&str>)] = &[
        // Cloud providers
        (
            "Google Cloud Skills Boost",
            "https://www.cloudskillsboost.google/catalog?format[]=courses&free=true",
            "Cloud Computing",
            "Google Cloud",
            Some("a[href*=\"/course_templates/\"]"),
        ),
        (
            "AWS Skill Builder Free",
            "https://explore.skillbuilder.aws/learn/catalog?ctldoc-catalog-0=se-%22Free%22",
            "Cloud Computing",
            "Amazon Web Services",
            Some("a[href*=\"/learn/course/\"]"),
        ),
        (
            "Microsoft Learn",
            "https://learn.microsoft.com/en-us/credentials/browse/?credential_types=certification",
            "Cloud Computing",
            "Microsoft",
            Some("a[href*=\"/credentials/certifications/\"]"),
        ),
        (
            "IBM Skills",
            "https://www.ibm.com/training/badges",
            "Cloud Computing",
            "IBM",
            Some("a[href*=\"credly.com\"], a[href*=\"youracclaim.com\"]"),
        ),
        (
            "Oracle University Free",
            "https://education.oracle.com/learning-explorer",
            "Cloud Computing",
            "Oracle",
            Some("a[href*=\"oracle.com\"]"),
        ),
        // Learning platforms
        (
            "Coursera Free Certificates",
            "https://www.coursera.org/courses?query=free%20certificate&productTypeDescription=Free%20Courses",
            "Programming & Development",
            "Coursera",
            Some("a[href*=\"/learn/\"]"),
        ),
        (
            "edX Free Courses",
            "https://www.edx.org/search?tab=course&price=Free",
            "Programming & Development",
            "edX",
            Some("a[href*=\"/course/\"], a[href*=\"/learn/\"]"),
        ),
        (
            "FreeCodeCamp",
            "https://www.freecodecamp.org/learn",
            "Programming & Development",
            "freeCodeCamp",
            Some("a[href*=\"/learn/\"]"),
        ),
        (
            "Cognitive Class",
            "https://cognitiveclass.ai/courses",
            "AI & Machine Learning Engineering",
            "IBM",
            Some("a[href*=\"/courses/\"]"),
        ),
        (
            "Great Learning Free Courses",
            "https://www.mygreatlearning.com/academy/courses",
            "Programming & Development",
            "Great Learning",
            Some("a[href*=\"/academy/\"]"),
        ),
        // Security
        (
            "Cisco Networking Academy",
            "https://www.netacad.com/courses/all-courses",
            "Cybersecurity & Information Security",
            "Cisco",
            Some("a[href*=\"/courses/\"]"),
        ),
        (
            "Fortinet Training",
            "https://training.fortinet.com/local/psc/",
            "Cybersecurity & Information Security",
            "Fortinet",
            Some("a[href*=\"training.fortinet.com\"]"),
        ),
        // Others
        (
            "HubSpot Academy",
            "https://academy.hubspot.com/courses",
            "Digital Marketing & Social Media",
            "HubSpot",
            Some("a[href*=\"/courses/\"]"),
        ),
        (
            "Google Digital Garage",
            "https://learndigital.withgoogle.com/digitalgarage/courses",
            "Digital Marketing & Social Media",
            "Google",
            Some("a[href*=\"/course/\"]"),
        ),
        (
            "Salesforce Trailhead",
            "https://trailhead.salesforce.com/credentials/certifications",
            "Cloud Computing",
            "Salesforce",
            Some("a[href*=\"trailhead.salesforce.com\"]"),
        ),
    ];

    table
        .iter()
        .map(|(name, url, category, provider, links)| Source {
            name: name.to_string(),
            url: url.to_string(),
            category: category.to_string(),
            provider: provider.to_string(),
            links: links.map(|s| s.to_string()),
        })
        .collect()
}

/// Run the full discovery process: scrape every source, run every search
/// query, then keep only the candidates whose URLs answer a probe.
pub async fn discover_all(
    fetcher: &BoundedFetcher,
    config: &DiscoveryConfig,
    frontier: &mut Frontier,
) -> Vec<Certification> {
    println!("Starting certification discovery...");
    let mut all_discovered = Vec::new();

    println!("\n[1/3] Scraping certification sources...");
    for source in &config.sources {
        let certs = scrape::scrape_source(fetcher, source, config, frontier).await;
        all_discovered.extend(certs);
        tokio::time::sleep(Duration::from_millis(config.source_delay_ms)).await;
    }

    println!("\n[2/3] Searching web for new certifications...");
    for query in &config.search_queries {
        let preview: String = query.chars().take(40).collect();
        println!("  Searching: {}...", preview);
        let certs = search::search_query(fetcher, query, config, frontier).await;
        all_discovered.extend(certs);
        tokio::time::sleep(Duration::from_millis(config.query_delay_ms)).await;
    }

    println!(
        "\n[3/3] Validating {} discovered certifications...",
        all_discovered.len()
    );
    let checks = all_discovered
        .iter()
        .map(|cert| async move { fetcher.probe(&cert.url).await.is_reachable() })
        .collect::<Vec<_>>();
    let reachable = join_all(checks).await;

    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();
    for (cert, ok) in all_discovered.into_iter().zip(reachable) {
        if !ok {
            continue;
        }
        if seen.insert(normalize_url(&cert.url)) {
            unique.push(cert);
        }
    }

    println!("\nDiscovered {} new valid certifications", unique.len());
    unique
}

/// Render the markdown digest of a discovery run (`NEW_DISCOVERIES.md`).
pub fn render_discoveries(discoveries: &crate::types::Discoveries) -> String {
    let mut md = String::from("# New Certification Discoveries\n\n");
    md.push_str(&format!("**Discovered:** {}\n\n", discoveries.discovered_at));
    md.push_str(&format!(
        "Found **{}** potential new certifications:\n\n",
        discoveries.count
    ));

    for cert in &discoveries.certifications {
        md.push_str(&format!("### {}\n", cert.name));
        md.push_str(&format!("- **Provider:** {}\n", cert.provider));
        md.push_str(&format!("- **Category:** {}\n", cert.category));
        md.push_str(&format!("- **URL:** {}\n", cert.url));
        md.push_str(&format!(
            "- **Description:** {}\n\n",
            crate::validator::truncate(&cert.description, 200)
        ));
    }

    md
}
