//! Source Page Scraper
//!
//! Extracts candidate certifications from a provider's catalog page:
//! anchors matched by the source's selector (every anchor when none is
//! declared), capped per source, titles bounded to a sane length, hrefs
//! resolved to absolute URLs.

use crate::clean::title_case;
use crate::dedup::Frontier;
use crate::discovery::DiscoveryConfig;
use crate::fetcher::BoundedFetcher;
use crate::types::{Certification, Source};
use chrono::Utc;
use scraper::{Html, Selector};
use url::Url;

/// Scrape one source page. Unreachable or unparseable pages yield zero
/// candidates, never an error.
pub async fn scrape_source(
    fetcher: &BoundedFetcher,
    source: &Source,
    config: &DiscoveryConfig,
    frontier: &mut Frontier,
) -> Vec<Certification> {
    println!("  Scraping: {}", source.name);

    let html = fetcher.fetch_body(&source.url).await;
    if html.is_empty() {
        return vec![];
    }

    let links = extract_links(&html, source.links.as_deref(), config.max_links_per_source);

    let mut discovered = Vec::new();
    for (href, title) in links {
        let href = match resolve_href(&source.url, &href) {
            Some(href) => href,
            None => continue,
        };

        let provider = if source.provider.is_empty() {
            infer_provider(&href, config)
        } else {
            source.provider.clone()
        };

        if let Some(cert) = extract_candidate(&href, &title, &source.category, &provider, frontier)
        {
            discovered.push(cert);
        }
    }

    discovered
}

/// Pull (href, title) pairs out of a listing page.
///
/// Title falls back to the `title` then `aria-label` attribute when the
/// anchor has no visible text. An unparseable selector yields nothing,
/// matching the zero-candidates contract for malformed source config.
pub fn extract_links(html: &str, links_selector: Option<&str>, cap: usize) -> Vec<(String, String)> {
    let document = Html::parse_document(html);
    let selector_str = links_selector.unwrap_or("a[href]");

    let mut pairs = Vec::new();
    if let Ok(selector) = Selector::parse(selector_str) {
        for element in document.select(&selector).take(cap) {
            let href = match element.value().attr("href") {
                Some(href) if !href.is_empty() => href,
                _ => continue,
            };

            let mut title = element.text().collect::<Vec<_>>().join(" ");
            if title.trim().is_empty() {
                title = element
                    .value()
                    .attr("title")
                    .or_else(|| element.value().attr("aria-label"))
                    .unwrap_or("")
                    .to_string();
            }

            pairs.push((href.to_string(), title));
        }
    }

    pairs
}

/// Resolve an href to an absolute URL against the source page's
/// scheme + host. Hrefs that are neither absolute-http(s) nor
/// root-relative are discarded.
pub fn resolve_href(base: &str, href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    if href.starts_with('/') {
        let base = Url::parse(base).ok()?;
        return base.join(href).ok().map(|u| u.to_string());
    }
    None
}

/// Build a candidate from a discovered (url, title) pair, gated through
/// the frontier. Accepted candidates enter the frontier immediately so
/// later candidates in the same run are deduplicated against them.
pub fn extract_candidate(
    url: &str,
    title: &str,
    category: &str,
    provider: &str,
    frontier: &mut Frontier,
) -> Option<Certification> {
    if url.is_empty() {
        return None;
    }

    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    let title_len = title.chars().count();
    if !(5..=200).contains(&title_len) {
        return None;
    }

    if frontier.is_duplicate(url, &title) {
        return None;
    }
    frontier.insert(url, &title);

    Some(Certification {
        id: 0,
        category: category.to_string(),
        name: title,
        provider: provider.to_string(),
        url: url.to_string(),
        description: format!("Free certification from {}", provider),
        duration: "Self-paced".to_string(),
        level: "Beginner".to_string(),
        prerequisites: String::new(),
        expiration: String::new(),
        discovered_at: Some(Utc::now().to_rfc3339()),
        validated: None,
        last_checked: None,
    })
}

/// Infer a provider label from a URL's domain via the ordered rule table;
/// first matching rule wins. Falls back to the title-cased first domain
/// label, or "Unknown" when the domain is unparseable.
pub fn infer_provider(url: &str, config: &DiscoveryConfig) -> String {
    let domain = match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|h| h.to_lowercase())
            .unwrap_or_default(),
        Err(_) => return "Unknown".to_string(),
    };
    if domain.is_empty() {
        return "Unknown".to_string();
    }

    for (needle, provider) in &config.provider_domains {
        if domain.contains(needle.as_str()) {
            return provider.clone();
        }
    }

    let bare = domain.trim_start_matches("www.");
    match bare.split('.').next() {
        Some(label) if !label.is_empty() => title_case(label),
        _ => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_boundaries() {
        let mut frontier = Frontier::new();
        assert!(extract_candidate("https://a.com/1", "abcd", "Cat", "P", &mut frontier).is_none());
        assert!(extract_candidate("https://a.com/2", "abcde", "Cat", "P", &mut frontier).is_some());

        let exactly_200 = "a".repeat(200);
        assert!(
            extract_candidate("https://a.com/3", &exactly_200, "Cat", "P", &mut frontier).is_some()
        );

        let over_200 = "a".repeat(201);
        assert!(
            extract_candidate("https://a.com/4", &over_200, "Cat", "P", &mut frontier).is_none()
        );
    }

    #[test]
    fn test_title_whitespace_is_normalized_before_bounds() {
        let mut frontier = Frontier::new();
        let cert = extract_candidate(
            "https://a.com/x",
            "  Intro   to\n Cloud  ",
            "Cat",
            "P",
            &mut frontier,
        )
        .unwrap();
        assert_eq!(cert.name, "Intro to Cloud");
    }

    #[test]
    fn test_duplicate_candidate_is_rejected() {
        let mut frontier = Frontier::new();
        assert!(
            extract_candidate("https://a.com/x", "Intro to Cloud", "Cat", "P", &mut frontier)
                .is_some()
        );
        // same name, different url
        assert!(
            extract_candidate("https://a.com/y", "Intro to Cloud", "Cat", "P", &mut frontier)
                .is_none()
        );
        // same url modulo trailing slash, different name
        assert!(
            extract_candidate("https://a.com/x/", "Other Course Name", "Cat", "P", &mut frontier)
                .is_none()
        );
    }

    #[test]
    fn test_resolve_href() {
        assert_eq!(
            resolve_href("https://a.com/catalog", "https://b.com/x"),
            Some("https://b.com/x".to_string())
        );
        assert_eq!(
            resolve_href("https://a.com/catalog", "/course/1"),
            Some("https://a.com/course/1".to_string())
        );
        assert_eq!(resolve_href("https://a.com/catalog", "course/1"), None);
        assert_eq!(resolve_href("https://a.com/catalog", "mailto:x@a.com"), None);
    }

    #[test]
    fn test_extract_links_with_selector() {
        let html = r#"
            <html><body>
              <a href="/learn/rust">Rust Basics</a>
              <a href="/pricing">Pricing</a>
              <a href="/learn/go"><span>Go</span> <span>Basics</span></a>
            </body></html>
        "#;
        let links = extract_links(html, Some("a[href*=\"/learn/\"]"), 50);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], ("/learn/rust".to_string(), "Rust Basics".to_string()));
        let second_title = links[1].1.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(second_title, "Go Basics");
    }

    #[test]
    fn test_extract_links_falls_back_to_aria_label() {
        let html = r#"<a href="/learn/x"><img src="badge.png"></a>"#;
        let links = extract_links(html, None, 50);
        assert_eq!(links[0].1, "");

        let html = r#"<a href="/learn/x" aria-label="Cloud Fundamentals"><img src="b.png"></a>"#;
        let links = extract_links(html, None, 50);
        assert_eq!(links[0].1, "Cloud Fundamentals");
    }

    #[test]
    fn test_extract_links_caps_results() {
        let anchors: String = (0..60)
            .map(|i| format!("<a href=\"/learn/{}\">Course number {}</a>", i, i))
            .collect();
        let links = extract_links(&anchors, None, 50);
        assert_eq!(links.len(), 50);
    }

    #[test]
    fn test_infer_provider_rule_table_first_match_wins() {
        let config = DiscoveryConfig::default();
        // google.com precedes cloud.google.com in the table
        assert_eq!(
            infer_provider("https://cloud.google.com/training", &config),
            "Google"
        );
        assert_eq!(
            infer_provider("https://www.coursera.org/learn/x", &config),
            "Coursera"
        );
    }

    #[test]
    fn test_infer_provider_falls_back_to_domain_label() {
        let config = DiscoveryConfig::default();
        assert_eq!(
            infer_provider("https://www.example-academy.io/courses", &config),
            "Example-Academy"
        );
    }

    #[test]
    fn test_infer_provider_unparseable_is_unknown() {
        let config = DiscoveryConfig::default();
        assert_eq!(infer_provider("not a url", &config), "Unknown");
    }
}
