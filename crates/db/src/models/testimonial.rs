//! Patient testimonial model and DTOs.

use medtour_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Testimonial {
    pub id: DbId,
    pub patient_name: String,
    pub patient_country: Option<String>,
    pub treatment_id: Option<DbId>,
    pub treatment_name: Option<String>,
    pub hospital_id: Option<DbId>,
    pub hospital_name: Option<String>,
    pub doctor_id: Option<DbId>,
    pub doctor_name: Option<String>,
    pub rating: i16,
    pub content: String,
    pub photo: Option<String>,
    pub video_url: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTestimonial {
    pub patient_name: String,
    pub patient_country: Option<String>,
    pub treatment_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    pub doctor_id: Option<DbId>,
    pub rating: i16,
    pub content: String,
    pub photo: Option<String>,
    pub video_url: Option<String>,
    pub status: Option<String>,
}

/// Partial update. A link id of `0` clears that link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTestimonial {
    pub patient_name: Option<String>,
    pub patient_country: Option<String>,
    pub treatment_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    pub doctor_id: Option<DbId>,
    pub rating: Option<i16>,
    pub content: Option<String>,
    pub photo: Option<String>,
    pub video_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialFilter {
    pub treatment_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    pub doctor_id: Option<DbId>,
    pub rating: Option<i16>,
}
