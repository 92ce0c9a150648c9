use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationDraft, ApplicationFilter};
use crate::models::reminder::{
    NewReminder, Reminder, ReminderDetail, ReminderDetailRow, ReminderFilter, ReminderUpdate,
};
use crate::models::user::User;
use crate::store::TrackerStore;

const REMINDER_DETAIL_SELECT: &str = r#"
    SELECT r.id, r.application_id, r.description, r.due_date, r.completed,
           r.created_at, r.updated_at,
           a.company, a.position, a.user_id AS owner_id
    FROM reminders r
    JOIN applications a ON a.id = r.application_id
"#;

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackerStore for PgStore {
    async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_session(
        &self,
        token_hash: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token_hash)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_session_user(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_applications(
        &self,
        user_id: Uuid,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT *
            FROM applications
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR company ILIKE $3 OR position ILIKE $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.status)
        .bind(filter.search.as_deref().map(like_pattern))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_application(
        &self,
        user_id: Uuid,
        draft: &ApplicationDraft,
    ) -> Result<Application, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications
                (id, user_id, company, position, location, status, applied_date,
                 response_date, salary, notes, contact_name, contact_email, url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&draft.company)
        .bind(&draft.position)
        .bind(&draft.location)
        .bind(draft.status)
        .bind(draft.applied_date)
        .bind(draft.response_date)
        .bind(&draft.salary)
        .bind(&draft.notes)
        .bind(&draft.contact_name)
        .bind(&draft.contact_email)
        .bind(&draft.url)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_application(
        &self,
        id: Uuid,
        draft: &ApplicationDraft,
    ) -> Result<Option<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET company = $2, position = $3, location = $4, status = $5,
                applied_date = $6, response_date = $7, salary = $8, notes = $9,
                contact_name = $10, contact_email = $11, url = $12,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.company)
        .bind(&draft.position)
        .bind(&draft.location)
        .bind(draft.status)
        .bind(draft.applied_date)
        .bind(draft.response_date)
        .bind(&draft.salary)
        .bind(&draft.notes)
        .bind(&draft.contact_name)
        .bind(&draft.contact_email)
        .bind(&draft.url)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_reminders(
        &self,
        user_id: Uuid,
        filter: &ReminderFilter,
    ) -> Result<Vec<ReminderDetail>, sqlx::Error> {
        let sql = format!(
            r#"{REMINDER_DETAIL_SELECT}
            WHERE a.user_id = $1
              AND ($2::uuid IS NULL OR r.application_id = $2)
              AND ($3::boolean IS NULL OR r.completed = $3)
            ORDER BY r.due_date ASC, r.created_at ASC
            "#
        );
        let rows = sqlx::query_as::<_, ReminderDetailRow>(&sql)
            .bind(user_id)
            .bind(filter.application_id)
            .bind(filter.completed)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ReminderDetail::from).collect())
    }

    async fn find_reminder(&self, id: Uuid) -> Result<Option<ReminderDetail>, sqlx::Error> {
        let sql = format!("{REMINDER_DETAIL_SELECT} WHERE r.id = $1");
        let row = sqlx::query_as::<_, ReminderDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ReminderDetail::from))
    }

    async fn insert_reminder(&self, reminder: &NewReminder) -> Result<Reminder, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (id, application_id, description, due_date, completed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reminder.application_id)
        .bind(&reminder.description)
        .bind(reminder.due_date)
        .bind(reminder.completed)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_reminder(
        &self,
        id: Uuid,
        update: &ReminderUpdate,
    ) -> Result<Option<Reminder>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            r#"
            UPDATE reminders
            SET description = $2, due_date = $3, completed = COALESCE($4, completed),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.description)
        .bind(update.due_date)
        .bind(update.completed)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_reminder(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Builds an `ILIKE` pattern that matches `term` literally anywhere in the column.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
