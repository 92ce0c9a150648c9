mod config;
mod errors;
mod firecrawl;
mod routes;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::firecrawl::FirecrawlClient;
use crate::routes::{build_router, ProxyState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Firecrawl MCP proxy v{}", env!("CARGO_PKG_VERSION"));

    let scraper = FirecrawlClient::new(
        config.firecrawl_api_key.clone(),
        config.firecrawl_base_url.clone(),
    )?;
    info!("Firecrawl client initialized ({})", config.firecrawl_base_url);

    let app = build_router(ProxyState {
        scraper: Arc::new(scraper),
    })
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}, manifest at /.well-known/mcp");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
