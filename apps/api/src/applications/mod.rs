// Job applications: ownership-checked CRUD, dashboard stats and CSV export.

pub mod export;
pub mod handlers;
pub mod payload;
pub mod stats;
