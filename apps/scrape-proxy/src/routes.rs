use std::sync::Arc;

use axum::{
    extract::{FromRequest, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::ProxyError;
use crate::firecrawl::WebScraper;

/// JSON body whose rejections become `ProxyError`s.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ProxyError))]
pub struct ToolInput<T>(pub T);

#[derive(Clone)]
pub struct ProxyState {
    pub scraper: Arc<dyn WebScraper>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractPayload {
    url: Option<String>,
    prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapePayload {
    url: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route("/.well-known/mcp", get(handle_manifest))
        .route("/api/extractWebData", post(handle_extract))
        .route("/api/scrapeWebpage", post(handle_scrape))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// GET /.well-known/mcp
pub async fn handle_manifest() -> Json<Value> {
    Json(json!({
        "schema_version": "1.0.0",
        "name": "firecrawl",
        "description": "Extract data from the web using Firecrawl",
        "vendor": "Custom",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": [
            {
                "name": "extractWebData",
                "description": "Extract structured data from a webpage using Firecrawl",
                "input_schema": {
                    "type": "object",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "The URL of the webpage to extract data from"
                        },
                        "prompt": {
                            "type": "string",
                            "description": "A natural language prompt describing what data to extract"
                        }
                    },
                    "required": ["url", "prompt"]
                },
                "output_schema": {
                    "type": "object",
                    "properties": {
                        "data": {
                            "type": "object",
                            "description": "The extracted data from the webpage"
                        }
                    }
                }
            },
            {
                "name": "scrapeWebpage",
                "description": "Get the full HTML content of a webpage",
                "input_schema": {
                    "type": "object",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "The URL of the webpage to scrape"
                        }
                    },
                    "required": ["url"]
                },
                "output_schema": {
                    "type": "object",
                    "properties": {
                        "html": {
                            "type": "string",
                            "description": "The HTML content of the webpage"
                        }
                    }
                }
            }
        ]
    }))
}

/// POST /api/extractWebData
pub async fn handle_extract(
    State(state): State<ProxyState>,
    ToolInput(payload): ToolInput<ExtractPayload>,
) -> Result<Json<Value>, ProxyError> {
    let (Some(url), Some(prompt)) = (present(payload.url), present(payload.prompt)) else {
        return Err(ProxyError::Validation("URL and prompt are required"));
    };

    info!("Extracting data from {url}");
    let data = state
        .scraper
        .extract(&url, &prompt)
        .await
        .map_err(|source| ProxyError::Upstream {
            context: "Failed to extract data",
            source,
        })?;
    Ok(Json(json!({ "data": data })))
}

/// POST /api/scrapeWebpage
pub async fn handle_scrape(
    State(state): State<ProxyState>,
    ToolInput(payload): ToolInput<ScrapePayload>,
) -> Result<Json<Value>, ProxyError> {
    let url = present(payload.url).ok_or(ProxyError::Validation("URL is required"))?;

    info!("Scraping {url}");
    let page = state
        .scraper
        .crawl(&url)
        .await
        .map_err(|source| ProxyError::Upstream {
            context: "Failed to scrape webpage",
            source,
        })?;
    let html = page.get("html").cloned().unwrap_or(Value::Null);
    Ok(Json(json!({ "html": html })))
}

/// GET /health
pub async fn handle_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Firecrawl MCP proxy is running"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use crate::firecrawl::FirecrawlError;

    #[derive(Default)]
    struct FakeScraper {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl WebScraper for FakeScraper {
        async fn extract(&self, url: &str, prompt: &str) -> Result<Value, FirecrawlError> {
            self.calls.lock().await.push(format!("extract {url} {prompt}"));
            if self.fail {
                return Err(FirecrawlError::Api {
                    status: 500,
                    body: json!({"error": "boom"}),
                });
            }
            Ok(json!({"title": "Engineer"}))
        }

        async fn crawl(&self, url: &str) -> Result<Value, FirecrawlError> {
            self.calls.lock().await.push(format!("crawl {url}"));
            Ok(json!({"html": "<p>hi</p>", "status": "done"}))
        }
    }

    fn app(scraper: Arc<FakeScraper>) -> Router {
        build_router(ProxyState { scraper })
    }

    async fn request(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_manifest_lists_both_tools() {
        let (status, body) = request(app(Arc::default()), "GET", "/.well-known/mcp", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "firecrawl");
        let tools: Vec<&str> = body["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(tools, vec!["extractWebData", "scrapeWebpage"]);
        assert_eq!(body["tools"][0]["input_schema"]["required"], json!(["url", "prompt"]));
    }

    #[tokio::test]
    async fn test_extract_requires_url_and_prompt() {
        let scraper = Arc::new(FakeScraper::default());
        let (status, body) = request(
            app(scraper.clone()),
            "POST",
            "/api/extractWebData",
            Some(json!({"url": "https://example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "URL and prompt are required");
        assert!(scraper.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_extract_wraps_upstream_data() {
        let scraper = Arc::new(FakeScraper::default());
        let (status, body) = request(
            app(scraper.clone()),
            "POST",
            "/api/extractWebData",
            Some(json!({"url": "https://example.com/job", "prompt": "job title"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Engineer");
        assert_eq!(
            *scraper.calls.lock().await,
            vec!["extract https://example.com/job job title".to_string()]
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let scraper = Arc::new(FakeScraper {
            fail: true,
            ..Default::default()
        });
        let (status, body) = request(
            app(scraper),
            "POST",
            "/api/extractWebData",
            Some(json!({"url": "https://example.com", "prompt": "anything"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["message"], "Failed to extract data");
        assert_eq!(body["error"]["details"]["error"], "boom");
    }

    #[tokio::test]
    async fn test_scrape_returns_html() {
        let (status, body) = request(
            app(Arc::default()),
            "POST",
            "/api/scrapeWebpage",
            Some(json!({"url": "https://example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"html": "<p>hi</p>"}));

        let (status, _) = request(
            app(Arc::default()),
            "POST",
            "/api/scrapeWebpage",
            Some(json!({"url": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mistyped_body_is_json_bad_request() {
        let (status, body) = request(
            app(Arc::default()),
            "POST",
            "/api/scrapeWebpage",
            Some(json!({"url": 42})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = request(app(Arc::default()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
