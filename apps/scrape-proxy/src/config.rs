use anyhow::{Context, Result};

pub const DEFAULT_FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev";

/// Proxy configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub firecrawl_api_key: String,
    pub firecrawl_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT has an invalid value: '{raw}'"))?,
            Err(_) => 3030,
        };

        Ok(Config {
            firecrawl_api_key: std::env::var("FIRECRAWL_API_KEY")
                .context("Required environment variable 'FIRECRAWL_API_KEY' is not set")?,
            firecrawl_base_url: std::env::var("FIRECRAWL_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_FIRECRAWL_BASE_URL.to_string()),
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
