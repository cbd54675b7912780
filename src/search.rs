//! Web Search Discoverer
//!
//! Extracts candidate certifications from DuckDuckGo HTML search result
//! pages: one request per query, a bounded number of results, redirect
//! wrappers unwrapped, and a keyword filter so only certification-shaped
//! results survive.

use crate::dedup::Frontier;
use crate::discovery::DiscoveryConfig;
use crate::fetcher::BoundedFetcher;
use crate::scrape::{extract_candidate, infer_provider};
use crate::types::Certification;
use scraper::{Html, Selector};
use url::Url;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Run one search query and return the surviving candidates. Failed
/// requests and unparseable pages yield zero candidates.
pub async fn search_query(
    fetcher: &BoundedFetcher,
    query: &str,
    config: &DiscoveryConfig,
    frontier: &mut Frontier,
) -> Vec<Certification> {
    let search_url = match Url::parse_with_params(SEARCH_ENDPOINT, &[("q", query)]) {
        Ok(url) => url.to_string(),
        Err(_) => return vec![],
    };

    let html = fetcher.fetch_body(&search_url).await;
    if html.is_empty() {
        return vec![];
    }

    let mut discovered = Vec::new();
    for (title, href) in parse_search_results(&html, config.max_search_results) {
        let url = unwrap_redirect(&href);
        if !url.starts_with("http://") && !url.starts_with("https://") {
            continue;
        }

        if !matches_cert_keywords(&title, &url, &config.cert_keywords) {
            continue;
        }

        let provider = infer_provider(&url, config);
        if let Some(cert) =
            extract_candidate(&url, &title, &config.default_category, &provider, frontier)
        {
            discovered.push(cert);
        }
    }

    discovered
}

/// Pull (title, href) pairs out of a result page, capped at `max_results`.
pub fn parse_search_results(html: &str, max_results: usize) -> Vec<(String, String)> {
    let document = Html::parse_document(html);

    let result_selector = match Selector::parse(".result") {
        Ok(s) => s,
        Err(_) => return vec![],
    };
    let link_selector = match Selector::parse(".result__a") {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    let mut pairs = Vec::new();
    for result in document.select(&result_selector).take(max_results) {
        let link = match result.select(&link_selector).next() {
            Some(link) => link,
            None => continue,
        };

        let title = link
            .text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let href = link.value().attr("href").unwrap_or("").to_string();
        if href.is_empty() {
            continue;
        }

        pairs.push((title, href));
    }

    pairs
}

/// Undo the search engine's redirect wrapper by reading the `uddg` query
/// parameter; returns the href unchanged when no wrapper is present.
pub fn unwrap_redirect(href: &str) -> String {
    if !href.contains("uddg=") {
        return href.to_string();
    }

    // Result hrefs are scheme-relative ("//duckduckgo.com/l/?uddg=...")
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    if let Ok(parsed) = Url::parse(&absolute) {
        for (key, value) in parsed.query_pairs() {
            if key == "uddg" {
                return value.into_owned();
            }
        }
    }

    href.to_string()
}

fn matches_cert_keywords(title: &str, url: &str, keywords: &[String]) -> bool {
    let title_lower = title.to_lowercase();
    let url_lower = url.to_lowercase();
    keywords
        .iter()
        .any(|kw| title_lower.contains(kw.as_str()) || url_lower.contains(kw.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_redirect_decodes_destination() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.coursera.org%2Flearn%2Fpython&rut=abc";
        assert_eq!(unwrap_redirect(href), "https://www.coursera.org/learn/python");
    }

    #[test]
    fn test_unwrap_redirect_passes_plain_hrefs_through() {
        assert_eq!(
            unwrap_redirect("https://example.com/course"),
            "https://example.com/course"
        );
    }

    #[test]
    fn test_keyword_filter() {
        let keywords: Vec<String> = ["certif", "course", "training"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(matches_cert_keywords(
            "Free AWS Certification Guide",
            "https://example.com/page",
            &keywords
        ));
        assert!(matches_cert_keywords(
            "Some unrelated title",
            "https://example.com/course/rust",
            &keywords
        ));
        assert!(!matches_cert_keywords(
            "Daily news digest",
            "https://example.com/news",
            &keywords
        ));
    }

    #[test]
    fn test_parse_search_results_caps_and_extracts() {
        let results: String = (0..12)
            .map(|i| {
                format!(
                    "<div class=\"result\"><a class=\"result__a\" href=\"//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2F{}\">Result number {}</a></div>",
                    i, i
                )
            })
            .collect();
        let html = format!("<html><body>{}</body></html>", results);

        let pairs = parse_search_results(&html, 10);
        assert_eq!(pairs.len(), 10);
        assert_eq!(pairs[0].0, "Result number 0");
        assert_eq!(
            unwrap_redirect(&pairs[0].1),
            "https://example.com/0"
        );
    }

    #[test]
    fn test_result_without_link_is_skipped() {
        let html = r#"<div class="result"><span>no anchor here</span></div>"#;
        assert!(parse_search_results(html, 10).is_empty());
    }
}
