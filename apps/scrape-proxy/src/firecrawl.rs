//! Firecrawl client: the only code in the proxy that talks to the scraping API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum FirecrawlError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Firecrawl API error (status {status})")]
    Api { status: u16, body: Value },
}

impl FirecrawlError {
    /// Rate limits, upstream 5xx and transport failures are worth another try.
    fn is_retryable(&self) -> bool {
        match self {
            FirecrawlError::Http(e) => !e.is_decode(),
            FirecrawlError::Api { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// The two upstream operations the proxy exposes as tools.
#[async_trait]
pub trait WebScraper: Send + Sync {
    /// Structured extraction driven by a natural-language prompt.
    async fn extract(&self, url: &str, prompt: &str) -> Result<Value, FirecrawlError>;

    /// Fetches a page; the response carries its HTML under `html`.
    async fn crawl(&self, url: &str) -> Result<Value, FirecrawlError>;
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    url: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct CrawlRequest<'a> {
    url: &'a str,
}

#[derive(Clone)]
pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    base_url: String,
    backoff: Duration,
}

impl FirecrawlClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, FirecrawlError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url,
            backoff: INITIAL_BACKOFF,
        })
    }

    /// Overrides the first retry delay; later delays double from it.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// POSTs `body` to `{base_url}{path}` and returns the JSON response.
    /// Retries on 429, 5xx and transport errors with exponential backoff.
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, FirecrawlError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 1;

        loop {
            match self.post_once(&url, body).await {
                Err(err) if attempt < MAX_ATTEMPTS && err.is_retryable() => {
                    let delay = self.backoff * (1 << (attempt - 1));
                    warn!(
                        "Firecrawl call to {path} failed (attempt {attempt}): {err}; retrying after {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => {
                    if result.is_ok() {
                        debug!("Firecrawl call to {path} succeeded on attempt {attempt}");
                    }
                    return result;
                }
            }
        }
    }

    async fn post_once<B: Serialize + Sync>(&self, url: &str, body: &B) -> Result<Value, FirecrawlError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Err(FirecrawlError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl WebScraper for FirecrawlClient {
    async fn extract(&self, url: &str, prompt: &str) -> Result<Value, FirecrawlError> {
        self.post("/extract", &ExtractRequest { url, prompt }).await
    }

    async fn crawl(&self, url: &str) -> Result<Value, FirecrawlError> {
        self.post("/crawl", &CrawlRequest { url }).await
    }
}
