use std::sync::Arc;

use crate::config::Config;
use crate::store::TrackerStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend. PostgreSQL in production, in-memory under test.
    pub store: Arc<dyn TrackerStore>,
    pub config: Config,
}
