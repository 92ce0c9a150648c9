//! In-memory `TrackerStore` used by the handler tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationDraft, ApplicationFilter};
use crate::models::reminder::{
    NewReminder, Reminder, ReminderApplication, ReminderDetail, ReminderFilter, ReminderUpdate,
};
use crate::models::user::User;
use crate::store::TrackerStore;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    applications: Vec<Application>,
    reminders: Vec<Reminder>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.tables.lock().await.sessions.len()
    }

    pub async fn reminder_count(&self) -> usize {
        self.tables.lock().await.reminders.len()
    }
}

fn application_matches(filter: &ApplicationFilter, application: &Application) -> bool {
    if filter.status.is_some_and(|status| status != application.status) {
        return false;
    }
    match &filter.search {
        Some(term) => {
            let term = term.to_lowercase();
            application.company.to_lowercase().contains(&term)
                || application.position.to_lowercase().contains(&term)
        }
        None => true,
    }
}

fn detail_for(tables: &Tables, reminder: &Reminder) -> Option<ReminderDetail> {
    let parent = tables
        .applications
        .iter()
        .find(|a| a.id == reminder.application_id)?;
    Some(ReminderDetail {
        reminder: reminder.clone(),
        application: ReminderApplication {
            id: parent.id,
            company: parent.company.clone(),
            position: parent.position.clone(),
        },
        owner_id: parent.user_id,
    })
}

#[async_trait]
impl TrackerStore for MemoryStore {
    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.map(str::to_string),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_session(
        &self,
        token_hash: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let mut tables = self.tables.lock().await;
        tables
            .sessions
            .insert(token_hash.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn find_session_user(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error> {
        let tables = self.tables.lock().await;
        let user = match tables.sessions.get(token_hash) {
            Some((user_id, expires_at)) if *expires_at > now => {
                tables.users.iter().find(|u| u.id == *user_id).cloned()
            }
            _ => None,
        };
        Ok(user)
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), sqlx::Error> {
        self.tables.lock().await.sessions.remove(token_hash);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, (_, expires_at)| *expires_at > now);
        Ok((before - tables.sessions.len()) as u64)
    }

    async fn list_applications(
        &self,
        user_id: Uuid,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let tables = self.tables.lock().await;
        let mut applications: Vec<Application> = tables
            .applications
            .iter()
            .filter(|a| a.user_id == user_id && application_matches(filter, a))
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, sqlx::Error> {
        let tables = self.tables.lock().await;
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn insert_application(
        &self,
        user_id: Uuid,
        draft: &ApplicationDraft,
    ) -> Result<Application, sqlx::Error> {
        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            user_id,
            company: draft.company.clone(),
            position: draft.position.clone(),
            location: draft.location.clone(),
            status: draft.status,
            applied_date: draft.applied_date,
            response_date: draft.response_date,
            salary: draft.salary.clone(),
            notes: draft.notes.clone(),
            contact_name: draft.contact_name.clone(),
            contact_email: draft.contact_email.clone(),
            url: draft.url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables
            .lock()
            .await
            .applications
            .push(application.clone());
        Ok(application)
    }

    async fn update_application(
        &self,
        id: Uuid,
        draft: &ApplicationDraft,
    ) -> Result<Option<Application>, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        let Some(application) = tables.applications.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        application.company = draft.company.clone();
        application.position = draft.position.clone();
        application.location = draft.location.clone();
        application.status = draft.status;
        application.applied_date = draft.applied_date;
        application.response_date = draft.response_date;
        application.salary = draft.salary.clone();
        application.notes = draft.notes.clone();
        application.contact_name = draft.contact_name.clone();
        application.contact_email = draft.contact_email.clone();
        application.url = draft.url.clone();
        application.updated_at = Utc::now();
        Ok(Some(application.clone()))
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        let before = tables.applications.len();
        tables.applications.retain(|a| a.id != id);
        tables.reminders.retain(|r| r.application_id != id);
        Ok(tables.applications.len() < before)
    }

    async fn list_reminders(
        &self,
        user_id: Uuid,
        filter: &ReminderFilter,
    ) -> Result<Vec<ReminderDetail>, sqlx::Error> {
        let tables = self.tables.lock().await;
        let mut reminders: Vec<ReminderDetail> = tables
            .reminders
            .iter()
            .filter(|r| filter.application_id.map_or(true, |id| r.application_id == id))
            .filter(|r| filter.completed.map_or(true, |c| r.completed == c))
            .filter_map(|r| detail_for(&tables, r))
            .filter(|d| d.owner_id == user_id)
            .collect();
        reminders.sort_by(|a, b| {
            a.reminder
                .due_date
                .cmp(&b.reminder.due_date)
                .then(a.reminder.created_at.cmp(&b.reminder.created_at))
        });
        Ok(reminders)
    }

    async fn find_reminder(&self, id: Uuid) -> Result<Option<ReminderDetail>, sqlx::Error> {
        let tables = self.tables.lock().await;
        Ok(tables
            .reminders
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| detail_for(&tables, r)))
    }

    async fn insert_reminder(&self, reminder: &NewReminder) -> Result<Reminder, sqlx::Error> {
        let now = Utc::now();
        let row = Reminder {
            id: Uuid::new_v4(),
            application_id: reminder.application_id,
            description: reminder.description.clone(),
            due_date: reminder.due_date,
            completed: reminder.completed,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().await.reminders.push(row.clone());
        Ok(row)
    }

    async fn update_reminder(
        &self,
        id: Uuid,
        update: &ReminderUpdate,
    ) -> Result<Option<Reminder>, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        let Some(reminder) = tables.reminders.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        reminder.description = update.description.clone();
        reminder.due_date = update.due_date;
        if let Some(completed) = update.completed {
            reminder.completed = completed;
        }
        reminder.updated_at = Utc::now();
        Ok(Some(reminder.clone()))
    }

    async fn delete_reminder(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        let before = tables.reminders.len();
        tables.reminders.retain(|r| r.id != id);
        Ok(tables.reminders.len() < before)
    }
}
