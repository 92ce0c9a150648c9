//! CSV export of a user's applications with their reminders flattened into
//! one column. Quoting is RFC 4180 (via the `csv` crate), so commas, quotes and
//! line breaks inside fields survive a round trip.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use uuid::Uuid;

use crate::models::application::Application;
use crate::models::reminder::Reminder;

pub const EXPORT_FILENAME: &str = "job-applications.csv";

#[derive(Debug, Serialize)]
struct CsvApplicationRow<'a> {
    #[serde(rename = "Company")]
    company: &'a str,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "Location")]
    location: &'a str,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Applied Date")]
    applied_date: String,
    #[serde(rename = "Response Date")]
    response_date: String,
    #[serde(rename = "Salary")]
    salary: &'a str,
    #[serde(rename = "Contact Name")]
    contact_name: &'a str,
    #[serde(rename = "Contact Email")]
    contact_email: &'a str,
    #[serde(rename = "URL")]
    url: &'a str,
    #[serde(rename = "Notes")]
    notes: &'a str,
    #[serde(rename = "Reminders")]
    reminders: String,
}

fn format_day(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// `2024-03-20 Follow up with recruiter [done]; 2024-03-27 Send portfolio`
fn flatten_reminders(reminders: &[&Reminder]) -> String {
    reminders
        .iter()
        .map(|r| {
            let mut cell = format!("{} {}", format_day(&r.due_date), r.description);
            if r.completed {
                cell.push_str(" [done]");
            }
            cell
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Renders the export document.
///
/// Applications are ordered by applied date (newest first, ties broken by
/// creation time); each application's reminders by due date.
pub fn render_csv(applications: &[Application], reminders: &[Reminder]) -> Result<String> {
    let mut by_application: HashMap<Uuid, Vec<&Reminder>> = HashMap::new();
    for reminder in reminders {
        by_application
            .entry(reminder.application_id)
            .or_default()
            .push(reminder);
    }
    for list in by_application.values_mut() {
        list.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.created_at.cmp(&b.created_at))
        });
    }

    let mut ordered: Vec<&Application> = applications.iter().collect();
    ordered.sort_by(|a, b| {
        b.applied_date
            .cmp(&a.applied_date)
            .then(b.created_at.cmp(&a.created_at))
    });

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if ordered.is_empty() {
        // serialize() only emits the header alongside the first record.
        writer.write_record([
            "Company",
            "Position",
            "Location",
            "Status",
            "Applied Date",
            "Response Date",
            "Salary",
            "Contact Name",
            "Contact Email",
            "URL",
            "Notes",
            "Reminders",
        ])?;
    }

    for app in ordered {
        let reminders = by_application
            .get(&app.id)
            .map(|list| flatten_reminders(list))
            .unwrap_or_default();

        writer.serialize(CsvApplicationRow {
            company: &app.company,
            position: &app.position,
            location: &app.location,
            status: app.status.as_str(),
            applied_date: format_day(&app.applied_date),
            response_date: app.response_date.as_ref().map(format_day).unwrap_or_default(),
            salary: app.salary.as_deref().unwrap_or_default(),
            contact_name: app.contact_name.as_deref().unwrap_or_default(),
            contact_email: app.contact_email.as_deref().unwrap_or_default(),
            url: app.url.as_deref().unwrap_or_default(),
            notes: app.notes.as_deref().unwrap_or_default(),
            reminders,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}
