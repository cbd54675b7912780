//! Bounded HTTP Fetcher
//!
//! Every network operation in the pipeline goes through one of these:
//! - `probe`: HEAD with GET fallback, classifies reachability
//! - `fetch_body`: GET for page content, empty string on any failure
//!
//! A shared semaphore caps in-flight requests so the same code serves one
//! probe or ten thousand without exhausting sockets. No retries: the
//! pipeline is periodic and a transient failure self-heals on the next run.

use crate::types::{ProbeOutcome, UnreachableKind};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Maximum simultaneously in-flight requests.
    pub max_concurrent: usize,
    /// Per-request wall-clock timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 15,
            timeout_secs: 20,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl FetcherConfig {
    /// Configuration used by the standalone validator.
    pub fn validator() -> Self {
        Self {
            max_concurrent: 20,
            timeout_secs: 30,
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct BoundedFetcher {
    client: Client,
    gate: Arc<Semaphore>,
}

impl BoundedFetcher {
    pub fn new(config: &FetcherConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .danger_accept_invalid_certs(true)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            gate: Arc::new(Semaphore::new(config.max_concurrent)),
        }
    }

    /// Check whether a URL is reachable.
    ///
    /// HEAD first; a resolved status outside [200, 400) after redirects is
    /// inconclusive (some servers reject HEAD) and falls back to GET. Any
    /// transport failure is terminal for this probe and maps to
    /// `Unreachable` with a classified reason.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let _permit = match self.gate.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return ProbeOutcome::Unreachable {
                    status: None,
                    reason: UnreachableKind::Other,
                }
            }
        };

        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if (200..400).contains(&status) {
                    return ProbeOutcome::Reachable { status };
                }
                self.probe_with_get(url).await
            }
            Err(e) => ProbeOutcome::Unreachable {
                status: None,
                reason: classify_error(&e),
            },
        }
    }

    async fn probe_with_get(&self, url: &str) -> ProbeOutcome {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if (200..400).contains(&status) {
                    ProbeOutcome::Reachable { status }
                } else {
                    ProbeOutcome::Unreachable {
                        status: Some(status),
                        reason: UnreachableKind::HttpStatus,
                    }
                }
            }
            Err(e) => ProbeOutcome::Unreachable {
                status: None,
                reason: classify_error(&e),
            },
        }
    }

    /// Fetch a page body for extraction.
    ///
    /// Returns the body only on HTTP 200; the empty string signals failure
    /// and callers must treat it as "no candidates available".
    pub async fn fetch_body(&self, url: &str) -> String {
        let _permit = match self.gate.acquire().await {
            Ok(permit) => permit,
            Err(_) => return String::new(),
        };

        match self.client.get(url).send().await {
            Ok(response) => {
                if response.status().as_u16() != 200 {
                    return String::new();
                }
                response.text().await.unwrap_or_default()
            }
            Err(e) => {
                println!("  Error fetching {}: {}", url, e);
                String::new()
            }
        }
    }
}

/// Classify a transport error into an unreachable reason.
fn classify_error(e: &reqwest::Error) -> UnreachableKind {
    let message = e.to_string();
    if e.is_timeout() {
        UnreachableKind::Timeout
    } else if message.contains("SSL") || message.contains("certificate") {
        UnreachableKind::Tls
    } else if e.is_connect() {
        UnreachableKind::Connect
    } else if e.is_redirect() {
        UnreachableKind::TooManyRedirects
    } else if e.is_builder() {
        UnreachableKind::InvalidUrl
    } else {
        UnreachableKind::Other
    }
}
