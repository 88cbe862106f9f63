//! Doctor model and DTOs.
//!
//! Hospital, destination and specialty links are optional. In update DTOs an
//! id of `0` clears the link. Treatments are linked through the
//! `doctor_treatments` junction table.

use medtour_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Doctor {
    pub id: DbId,
    pub hospital_id: Option<DbId>,
    pub hospital_name: Option<String>,
    pub destination_id: Option<DbId>,
    pub destination_name: Option<String>,
    pub specialty_id: Option<DbId>,
    pub specialty_name: Option<String>,
    pub treatment_ids: Vec<DbId>,
    pub name: String,
    pub slug: String,
    pub title: Option<String>,
    pub qualifications: Option<String>,
    pub experience_years: Option<i32>,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub languages: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctor {
    pub hospital_id: Option<DbId>,
    pub destination_id: Option<DbId>,
    pub specialty_id: Option<DbId>,
    #[serde(default)]
    pub treatment_ids: Vec<DbId>,
    pub name: String,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub qualifications: Option<String>,
    pub experience_years: Option<i32>,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub languages: Option<Vec<String>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<String>,
}

/// Partial update. `treatment_ids`, when present, replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDoctor {
    pub hospital_id: Option<DbId>,
    pub destination_id: Option<DbId>,
    pub specialty_id: Option<DbId>,
    pub treatment_ids: Option<Vec<DbId>>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub qualifications: Option<String>,
    pub experience_years: Option<i32>,
    pub bio: Option<String>,
    pub photo: Option<String>,
    pub languages: Option<Vec<String>>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorFilter {
    pub specialty_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    pub destination_id: Option<DbId>,
    pub treatment_id: Option<DbId>,
}
