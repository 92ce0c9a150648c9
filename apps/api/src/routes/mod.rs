pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::reminders::handlers as reminders;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts and sessions
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/logout", post(auth::handle_logout))
        .route("/api/auth/session", get(auth::handle_session))
        // Applications
        .route(
            "/api/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/applications/stats",
            get(applications::handle_application_stats),
        )
        .route(
            "/api/applications/export",
            get(applications::handle_export_applications),
        )
        .route(
            "/api/applications/:id",
            get(applications::handle_get_application)
                .put(applications::handle_update_application)
                .delete(applications::handle_delete_application),
        )
        // Reminders
        .route(
            "/api/reminders",
            get(reminders::handle_list_reminders).post(reminders::handle_create_reminder),
        )
        .route(
            "/api/reminders/:id",
            get(reminders::handle_get_reminder)
                .put(reminders::handle_update_reminder)
                .delete(reminders::handle_delete_reminder),
        )
        .with_state(state)
}
