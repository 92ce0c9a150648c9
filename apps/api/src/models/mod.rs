pub mod application;
pub mod reminder;
pub mod user;
