//! Publication and submission status values.
//!
//! Stored as TEXT columns guarded by CHECK constraints; the string forms here
//! must match the migrations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_ARCHIVED: &str = "archived";

pub const CONTENT_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_PUBLISHED, STATUS_ARCHIVED];

pub const SUBMISSION_NEW: &str = "new";
pub const SUBMISSION_CONTACTED: &str = "contacted";
pub const SUBMISSION_IN_PROGRESS: &str = "in_progress";
pub const SUBMISSION_CLOSED: &str = "closed";

pub const SUBMISSION_STATUSES: &[&str] = &[
    SUBMISSION_NEW,
    SUBMISSION_CONTACTED,
    SUBMISSION_IN_PROGRESS,
    SUBMISSION_CLOSED,
];

/// Lifecycle of every publishable content entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentStatus::Draft => STATUS_DRAFT,
            ContentStatus::Published => STATUS_PUBLISHED,
            ContentStatus::Archived => STATUS_ARCHIVED,
        }
    }
}

impl FromStr for ContentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_DRAFT => Ok(ContentStatus::Draft),
            STATUS_PUBLISHED => Ok(ContentStatus::Published),
            STATUS_ARCHIVED => Ok(ContentStatus::Archived),
            other => Err(invalid("status", other, CONTENT_STATUSES)),
        }
    }
}

/// Follow-up state of an inbound enquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    New,
    Contacted,
    InProgress,
    Closed,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::New => SUBMISSION_NEW,
            SubmissionStatus::Contacted => SUBMISSION_CONTACTED,
            SubmissionStatus::InProgress => SUBMISSION_IN_PROGRESS,
            SubmissionStatus::Closed => SUBMISSION_CLOSED,
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SUBMISSION_NEW => Ok(SubmissionStatus::New),
            SUBMISSION_CONTACTED => Ok(SubmissionStatus::Contacted),
            SUBMISSION_IN_PROGRESS => Ok(SubmissionStatus::InProgress),
            SUBMISSION_CLOSED => Ok(SubmissionStatus::Closed),
            other => Err(invalid("submission status", other, SUBMISSION_STATUSES)),
        }
    }
}

/// Validate an optional content status, passing `None` through.
pub fn validate_content_status(status: Option<&str>) -> Result<(), CoreError> {
    if let Some(s) = status {
        s.parse::<ContentStatus>()?;
    }
    Ok(())
}

/// Validate an optional submission status, passing `None` through.
pub fn validate_submission_status(status: Option<&str>) -> Result<(), CoreError> {
    if let Some(s) = status {
        s.parse::<SubmissionStatus>()?;
    }
    Ok(())
}

fn invalid(what: &str, value: &str, allowed: &[&str]) -> CoreError {
    CoreError::Validation(format!(
        "Invalid {what} '{value}'. Must be one of: {}",
        allowed.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn content_status_round_trips_through_str() {
        for s in CONTENT_STATUSES {
            assert_eq!(s.parse::<ContentStatus>().unwrap().as_str(), *s);
        }
    }

    #[test]
    fn submission_status_in_progress_is_snake_case() {
        assert_eq!(
            "in_progress".parse::<SubmissionStatus>().unwrap(),
            SubmissionStatus::InProgress
        );
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }

    #[test]
    fn unknown_status_lists_allowed_values() {
        let err = validate_content_status(Some("live")).unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg.contains("draft, published, archived"));
    }

    #[test]
    fn none_passes_validation() {
        assert!(validate_content_status(None).is_ok());
        assert!(validate_submission_status(None).is_ok());
    }
}
