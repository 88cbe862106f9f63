//! Form submission (visitor enquiry) model and DTOs.

use medtour_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub form_type: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub treatment_id: Option<DbId>,
    pub treatment_name: Option<String>,
    pub message: Option<String>,
    pub source_page: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of the public submission form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmission {
    /// Defaults to `contact`.
    pub form_type: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub treatment_id: Option<DbId>,
    pub message: Option<String>,
    pub source_page: Option<String>,
}

/// Staff-side update: follow-up status and internal notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubmission {
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionFilter {
    pub form_type: Option<String>,
    pub treatment_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}
