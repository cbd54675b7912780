//! Candidate Deduplication
//!
//! Membership-tests candidates against the known universe of normalized
//! urls and names. The frontier starts from the current dataset and grows
//! as candidates are accepted, so later candidates are deduplicated against
//! earlier ones discovered in the same run. It is only ever mutated between
//! probes, never while a concurrent fan-out is reading it.

use crate::types::Certification;
use std::collections::HashSet;

/// Normalize a URL for uniqueness comparison: lowercase, one trailing
/// slash stripped.
pub fn normalize_url(url: &str) -> String {
    let lowered = url.trim().to_lowercase();
    match lowered.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// Normalize a display name for uniqueness comparison.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// The known universe of (normalized url, normalized name) pairs.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    urls: HashSet<String>,
    names: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the frontier from an existing dataset.
    pub fn from_records(records: &[Certification]) -> Self {
        let mut frontier = Self::new();
        for record in records {
            frontier.insert(&record.url, &record.name);
        }
        frontier
    }

    /// True iff the candidate collides with a known url OR a known name.
    pub fn is_duplicate(&self, url: &str, name: &str) -> bool {
        self.urls.contains(&normalize_url(url)) || self.names.contains(&normalize_name(name))
    }

    pub fn insert(&mut self, url: &str, name: &str) {
        self.urls.insert(normalize_url(url));
        self.names.insert(normalize_name(name));
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, url: &str) -> Certification {
        Certification {
            id: 0,
            category: "Cloud Computing".to_string(),
            name: name.to_string(),
            provider: "Test".to_string(),
            url: url.to_string(),
            description: String::new(),
            duration: String::new(),
            level: String::new(),
            prerequisites: String::new(),
            expiration: String::new(),
            discovered_at: None,
            validated: None,
            last_checked: None,
        }
    }

    #[test]
    fn test_normalize_url_lowercases_and_strips_slash() {
        assert_eq!(normalize_url("HTTPS://A.com/X/"), "https://a.com/x");
        assert_eq!(normalize_url("https://a.com/x"), "https://a.com/x");
    }

    #[test]
    fn test_normalize_name_case_folds() {
        assert_eq!(normalize_name("  Intro to Cloud "), "intro to cloud");
    }

    #[test]
    fn test_trailing_slash_candidate_is_duplicate() {
        let frontier = Frontier::from_records(&[record("AWS Basics", "https://a.com/x")]);
        assert!(frontier.is_duplicate("https://a.com/x/", "Something Else"));
    }

    #[test]
    fn test_same_name_different_url_is_duplicate() {
        let frontier = Frontier::from_records(&[record("Intro to Cloud", "https://a.com/x/")]);
        assert!(frontier.is_duplicate("https://a.com/y", "Intro to Cloud"));
    }

    #[test]
    fn test_fresh_candidate_is_not_duplicate() {
        let frontier = Frontier::from_records(&[record("Intro to Cloud", "https://a.com/x")]);
        assert!(!frontier.is_duplicate("https://b.com/z", "Advanced Networking"));
    }

    #[test]
    fn test_accepted_candidate_gates_later_ones() {
        let mut frontier = Frontier::new();
        assert!(!frontier.is_duplicate("https://a.com/x", "Intro to Cloud"));
        frontier.insert("https://a.com/x", "Intro to Cloud");
        assert!(frontier.is_duplicate("https://a.com/x/", "Other Title"));
        assert!(frontier.is_duplicate("https://b.com/y", "intro to cloud"));
    }
}
