use serde::Deserialize;

use crate::errors::AppError;
use crate::models::application::{ApplicationDraft, ApplicationStatus};
use crate::validation::{ensure_present, non_blank, parse_date, parse_optional_date};

/// Body of `POST /api/applications` and `PUT /api/applications/:id`.
///
/// Every field is optional at the serde level so that missing or blank values
/// produce one 400 listing them, rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub applied_date: Option<String>,
    pub response_date: Option<String>,
    pub salary: Option<String>,
    pub notes: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    #[serde(alias = "applicationUrl")]
    pub url: Option<String>,
}

impl ApplicationPayload {
    /// Validates the payload into the full replacement field set.
    pub fn into_draft(self) -> Result<ApplicationDraft, AppError> {
        ensure_present(&[
            ("company", &self.company),
            ("position", &self.position),
            ("location", &self.location),
            ("status", &self.status),
            ("appliedDate", &self.applied_date),
        ])?;

        let status = self
            .status
            .as_deref()
            .unwrap_or_default()
            .parse::<ApplicationStatus>()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let applied_date =
            parse_date("appliedDate", self.applied_date.as_deref().unwrap_or_default())?;
        let response_date = parse_optional_date("responseDate", self.response_date)?;

        Ok(ApplicationDraft {
            company: non_blank(self.company).unwrap_or_default(),
            position: non_blank(self.position).unwrap_or_default(),
            location: non_blank(self.location).unwrap_or_default(),
            status,
            applied_date,
            response_date,
            salary: non_blank(self.salary),
            notes: non_blank(self.notes),
            contact_name: non_blank(self.contact_name),
            contact_email: non_blank(self.contact_email),
            url: non_blank(self.url),
        })
    }
}
