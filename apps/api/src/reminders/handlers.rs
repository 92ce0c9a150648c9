//! Axum route handlers for the Reminders API.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::applications::handlers::MessageResponse;
use crate::auth::{authorize, AuthUser};
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::reminder::{Reminder, ReminderDetail};
use crate::reminders::payload::{CreateReminderPayload, ListRemindersQuery, UpdateReminderPayload};
use crate::state::AppState;

/// GET /api/reminders
pub async fn handle_list_reminders(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListRemindersQuery>,
) -> Result<Json<Vec<ReminderDetail>>, AppError> {
    let filter = query.into_filter()?;
    let reminders = state.store.list_reminders(auth.user.id, &filter).await?;
    Ok(Json(reminders))
}

/// POST /api/reminders
///
/// The target application goes through the ownership guard first.
pub async fn handle_create_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(payload): ApiJson<CreateReminderPayload>,
) -> Result<(StatusCode, Json<Reminder>), AppError> {
    let new_reminder = payload.into_new_reminder()?;
    authorize(
        state
            .store
            .find_application(new_reminder.application_id)
            .await?,
        &auth,
    )?;

    let reminder = state.store.insert_reminder(&new_reminder).await?;
    info!(
        "User {} added reminder {} to application {}",
        auth.user.id, reminder.id, reminder.application_id
    );
    Ok((StatusCode::CREATED, Json(reminder)))
}

/// GET /api/reminders/:id
pub async fn handle_get_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ReminderDetail>, AppError> {
    let reminder = authorize(state.store.find_reminder(id).await?, &auth)?;
    Ok(Json(reminder))
}

/// PUT /api/reminders/:id
pub async fn handle_update_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateReminderPayload>,
) -> Result<Json<Reminder>, AppError> {
    let update = payload.into_update()?;
    authorize(state.store.find_reminder(id).await?, &auth)?;

    let reminder = state
        .store
        .update_reminder(id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("Reminder not found".to_string()))?;
    info!("User {} updated reminder {id}", auth.user.id);
    Ok(Json(reminder))
}

/// DELETE /api/reminders/:id
pub async fn handle_delete_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    authorize(state.store.find_reminder(id).await?, &auth)?;

    if !state.store.delete_reminder(id).await? {
        return Err(AppError::NotFound("Reminder not found".to_string()));
    }
    info!("User {} deleted reminder {id}", auth.user.id);
    Ok(Json(MessageResponse {
        message: "Reminder deleted successfully",
    }))
}
