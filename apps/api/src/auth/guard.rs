use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::application::Application;
use crate::models::reminder::ReminderDetail;

/// A record that belongs to exactly one user.
pub trait Owned {
    /// Human-readable resource name used in error messages.
    const RESOURCE: &'static str;

    fn owner_id(&self) -> Uuid;
}

impl Owned for Application {
    const RESOURCE: &'static str = "Application";

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// A reminder is owned by whoever owns its parent application.
impl Owned for ReminderDetail {
    const RESOURCE: &'static str = "Reminder";

    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Ownership guard run before every read or mutation of a single record.
///
/// Missing → 404, owned by someone else → 403, otherwise the record.
pub fn authorize<T: Owned>(resource: Option<T>, caller: &AuthUser) -> Result<T, AppError> {
    let resource =
        resource.ok_or_else(|| AppError::NotFound(format!("{} not found", T::RESOURCE)))?;

    if resource.owner_id() != caller.user.id {
        tracing::warn!(
            "User {} denied access to {} owned by {}",
            caller.user.id,
            T::RESOURCE.to_lowercase(),
            resource.owner_id()
        );
        return Err(AppError::Forbidden(format!(
            "You do not have permission to access this {}",
            T::RESOURCE.to_lowercase()
        )));
    }

    Ok(resource)
}
