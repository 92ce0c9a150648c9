//! Persistence seam for the tracker.
//!
//! Handlers only see `TrackerStore`; `AppState` carries an `Arc<dyn TrackerStore>`
//! so the PostgreSQL backend can be swapped for the in-memory one under test.
//!
//! Lookups by id are deliberately not scoped to a user: the handlers need to
//! tell "missing" (404) from "someone else's" (403), which the ownership guard
//! decides from the returned row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::application::{Application, ApplicationDraft, ApplicationFilter};
use crate::models::reminder::{NewReminder, Reminder, ReminderDetail, ReminderFilter, ReminderUpdate};
use crate::models::user::User;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait TrackerStore: Send + Sync {
    // Users & sessions

    /// Inserts a user. Returns `None` when the email is already registered.
    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn create_session(
        &self,
        token_hash: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    /// Resolves a session to its user, ignoring sessions expired at `now`.
    async fn find_session_user(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn delete_session(&self, token_hash: &str) -> Result<(), sqlx::Error>;

    /// Drops every session expired at `now`; returns how many went.
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error>;

    // Applications

    /// Lists a user's applications, newest first by creation time.
    async fn list_applications(
        &self,
        user_id: Uuid,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, sqlx::Error>;

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, sqlx::Error>;

    async fn insert_application(
        &self,
        user_id: Uuid,
        draft: &ApplicationDraft,
    ) -> Result<Application, sqlx::Error>;

    /// Replaces every editable field. `None` if the row vanished meanwhile.
    async fn update_application(
        &self,
        id: Uuid,
        draft: &ApplicationDraft,
    ) -> Result<Option<Application>, sqlx::Error>;

    /// Deletes the application and, by cascade, its reminders.
    async fn delete_application(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // Reminders

    /// Lists reminders on the user's applications, soonest due first.
    async fn list_reminders(
        &self,
        user_id: Uuid,
        filter: &ReminderFilter,
    ) -> Result<Vec<ReminderDetail>, sqlx::Error>;

    async fn find_reminder(&self, id: Uuid) -> Result<Option<ReminderDetail>, sqlx::Error>;

    async fn insert_reminder(&self, reminder: &NewReminder) -> Result<Reminder, sqlx::Error>;

    async fn update_reminder(
        &self,
        id: Uuid,
        update: &ReminderUpdate,
    ) -> Result<Option<Reminder>, sqlx::Error>;

    async fn delete_reminder(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}
