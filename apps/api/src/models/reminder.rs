use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub application_id: Uuid,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of the parent application returned alongside a reminder.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderApplication {
    pub id: Uuid,
    pub company: String,
    pub position: String,
}

/// A reminder joined with its parent application.
///
/// `owner_id` is the parent application's user and is what the ownership
/// guard checks; it never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderDetail {
    #[serde(flatten)]
    pub reminder: Reminder,
    pub application: ReminderApplication,
    #[serde(skip_serializing)]
    pub owner_id: Uuid,
}

/// Flat row shape of the reminders ⋈ applications join.
#[derive(Debug, FromRow)]
pub struct ReminderDetailRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub company: String,
    pub position: String,
    pub owner_id: Uuid,
}

impl From<ReminderDetailRow> for ReminderDetail {
    fn from(row: ReminderDetailRow) -> Self {
        ReminderDetail {
            application: ReminderApplication {
                id: row.application_id,
                company: row.company,
                position: row.position,
            },
            owner_id: row.owner_id,
            reminder: Reminder {
                id: row.id,
                application_id: row.application_id,
                description: row.description,
                due_date: row.due_date,
                completed: row.completed,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    pub application_id: Uuid,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderUpdate {
    pub description: String,
    pub due_date: DateTime<Utc>,
    /// `None` keeps the stored flag.
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ReminderFilter {
    pub application_id: Option<Uuid>,
    pub completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_serializes_flat_with_application() {
        let now = Utc::now();
        let application_id = Uuid::new_v4();
        let detail = ReminderDetail::from(ReminderDetailRow {
            id: Uuid::new_v4(),
            application_id,
            description: "Send thank-you note".to_string(),
            due_date: now,
            completed: false,
            created_at: now,
            updated_at: now,
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            owner_id: Uuid::new_v4(),
        });

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["description"], "Send thank-you note");
        assert_eq!(json["completed"], false);
        assert!(json.get("dueDate").is_some());
        assert_eq!(json["application"]["company"], "Acme");
        assert_eq!(json["application"]["id"], application_id.to_string());
        assert!(json.get("ownerId").is_none());
        assert!(json.get("owner_id").is_none());
    }
}
