use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::reminder::{NewReminder, ReminderFilter, ReminderUpdate};
use crate::validation::{ensure_present, non_blank, parse_date};

/// Body of `POST /api/reminders`. `reminderDate` is accepted for `dueDate`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderPayload {
    pub application_id: Option<String>,
    #[serde(alias = "reminderDate")]
    pub due_date: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Body of `PUT /api/reminders/:id`.
///
/// `completed` keeps its stored value when omitted; the parent application
/// cannot be changed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminderPayload {
    #[serde(alias = "reminderDate")]
    pub due_date: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRemindersQuery {
    pub application_id: Option<String>,
    pub completed: Option<String>,
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("{field} must be a valid id")))
}

impl CreateReminderPayload {
    pub fn into_new_reminder(self) -> Result<NewReminder, AppError> {
        ensure_present(&[
            ("applicationId", &self.application_id),
            ("dueDate", &self.due_date),
            ("description", &self.description),
        ])?;

        Ok(NewReminder {
            application_id: parse_id(
                "applicationId",
                self.application_id.as_deref().unwrap_or_default(),
            )?,
            due_date: parse_date("dueDate", self.due_date.as_deref().unwrap_or_default())?,
            description: non_blank(self.description).unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
        })
    }
}

impl UpdateReminderPayload {
    pub fn into_update(self) -> Result<ReminderUpdate, AppError> {
        ensure_present(&[
            ("dueDate", &self.due_date),
            ("description", &self.description),
        ])?;

        Ok(ReminderUpdate {
            due_date: parse_date("dueDate", self.due_date.as_deref().unwrap_or_default())?,
            description: non_blank(self.description).unwrap_or_default(),
            completed: self.completed,
        })
    }
}

impl ListRemindersQuery {
    pub fn into_filter(self) -> Result<ReminderFilter, AppError> {
        let application_id = non_blank(self.application_id)
            .map(|raw| parse_id("applicationId", &raw))
            .transpose()?;
        let completed = match non_blank(self.completed).as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => {
                return Err(AppError::Validation(
                    "completed must be 'true' or 'false'".to_string(),
                ))
            }
        };
        Ok(ReminderFilter {
            application_id,
            completed,
        })
    }
}
