use serde::Serialize;

use crate::models::application::{Application, ApplicationStatus};

const RECENT_LIMIT: usize = 5;

/// Dashboard summary of a user's applications.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: usize,
    pub applied: usize,
    pub interview: usize,
    pub offer: usize,
    pub rejected: usize,
    pub recent_applications: Vec<Application>,
}

pub fn compute_stats(applications: &[Application]) -> ApplicationStats {
    let count = |status: ApplicationStatus| {
        applications
            .iter()
            .filter(|a| a.status == status)
            .count()
    };

    let mut recent: Vec<Application> = applications.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_LIMIT);

    ApplicationStats {
        total: applications.len(),
        applied: count(ApplicationStatus::Applied),
        interview: count(ApplicationStatus::Interview),
        offer: count(ApplicationStatus::Offer),
        rejected: count(ApplicationStatus::Rejected),
        recent_applications: recent,
    }
}
