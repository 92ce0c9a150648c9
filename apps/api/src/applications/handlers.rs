//! Axum route handlers for the Applications API.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::export::{render_csv, EXPORT_FILENAME};
use crate::applications::payload::ApplicationPayload;
use crate::applications::stats::{compute_stats, ApplicationStats};
use crate::auth::{authorize, AuthUser};
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::application::{Application, ApplicationFilter, ApplicationStatus};
use crate::models::reminder::ReminderFilter;
use crate::state::AppState;
use crate::validation::non_blank;

#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

impl ListApplicationsQuery {
    fn into_filter(self) -> Result<ApplicationFilter, AppError> {
        let status = non_blank(self.status)
            .map(|s| s.parse::<ApplicationStatus>())
            .transpose()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(ApplicationFilter {
            status,
            search: non_blank(self.search),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /api/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListApplicationsQuery>,
) -> Result<Json<Vec<Application>>, AppError> {
    let filter = query.into_filter()?;
    let applications = state.store.list_applications(auth.user.id, &filter).await?;
    Ok(Json(applications))
}

/// POST /api/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<ApplicationPayload>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let draft = payload.into_draft()?;
    let application = state.store.insert_application(auth.user.id, &draft).await?;
    info!(
        "User {} created application {}",
        auth.user.id, application.id
    );
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Application>, AppError> {
    let application = authorize(state.store.find_application(id).await?, &auth)?;
    Ok(Json(application))
}

/// PUT /api/applications/:id
///
/// Full replace: optional fields left out of the body are cleared.
pub async fn handle_update_application(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ApplicationPayload>,
) -> Result<Json<Application>, AppError> {
    let draft = payload.into_draft()?;
    authorize(state.store.find_application(id).await?, &auth)?;

    let updated = state
        .store
        .update_application(id, &draft)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    info!("User {} updated application {id}", auth.user.id);
    Ok(Json(updated))
}

/// DELETE /api/applications/:id
///
/// Reminders attached to the application go with it.
pub async fn handle_delete_application(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    authorize(state.store.find_application(id).await?, &auth)?;

    if !state.store.delete_application(id).await? {
        return Err(AppError::NotFound("Application not found".to_string()));
    }
    info!("User {} deleted application {id}", auth.user.id);
    Ok(Json(MessageResponse {
        message: "Application deleted successfully",
    }))
}

/// GET /api/applications/stats
pub async fn handle_application_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApplicationStats>, AppError> {
    let applications = state
        .store
        .list_applications(auth.user.id, &ApplicationFilter::default())
        .await?;
    Ok(Json(compute_stats(&applications)))
}

/// GET /api/applications/export
pub async fn handle_export_applications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let applications = state
        .store
        .list_applications(auth.user.id, &ApplicationFilter::default())
        .await?;
    let reminders: Vec<_> = state
        .store
        .list_reminders(auth.user.id, &ReminderFilter::default())
        .await?
        .into_iter()
        .map(|detail| detail.reminder)
        .collect();

    let csv = render_csv(&applications, &reminders)?;
    info!(
        "User {} exported {} applications",
        auth.user.id,
        applications.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        csv,
    ))
}
