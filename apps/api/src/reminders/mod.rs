// Follow-up reminders, owned transitively through their parent application.

pub mod handlers;
pub mod payload;
