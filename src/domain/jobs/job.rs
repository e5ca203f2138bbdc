//! Job listing entities

use serde::{Deserialize, Serialize};

use crate::domain::error::JobValidationError;

/// A job listing as returned by the backend.
///
/// The client never mutates a job; it only displays or forwards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub posted_date: String,
}

impl Job {
    /// Calendar date the job was posted (`YYYY-MM-DD`), or "Recently posted"
    /// when the backend sent something unparseable.
    pub fn posted_on(&self) -> &str {
        let date = self
            .posted_date
            .split_once('T')
            .map_or(self.posted_date.as_str(), |(date, _)| date);

        let bytes = date.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

        if well_formed {
            date
        } else {
            "Recently posted"
        }
    }

    /// Link for reaching the employer: phone numbers become `tel:`,
    /// anything else is treated as an email address.
    pub fn contact_uri(&self) -> String {
        let contact = self.contact.trim();
        if contact.starts_with('+') || contact.starts_with('0') {
            format!("tel:{}", contact.replace(' ', ""))
        } else {
            format!("mailto:{contact}")
        }
    }
}

/// Job-posting form as typed by the user.
///
/// `skills` is free text, comma separated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub skills: String,
    pub contact: String,
    pub description: String,
}

impl JobDraft {
    /// Validate the form and turn it into a request body.
    ///
    /// Fields are checked in form order; the first blank one is reported.
    pub fn validate(&self) -> Result<NewJob, JobValidationError> {
        let required = [
            ("title", &self.title),
            ("company", &self.company),
            ("location", &self.location),
            ("salary", &self.salary),
            ("contact", &self.contact),
            ("description", &self.description),
        ];

        if let Some((field, _)) = required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(JobValidationError { field });
        }

        Ok(NewJob {
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: self.location.trim().to_string(),
            salary: self.salary.trim().to_string(),
            skills: split_skills(&self.skills),
            contact: self.contact.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

/// Validated job ready to be posted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: String,
    pub skills: Vec<String>,
    pub contact: String,
    pub description: String,
}

/// Split comma-separated skills, trimming and dropping empties
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}
