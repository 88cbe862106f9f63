//! Hospital model and DTOs.
//!
//! Hospitals belong to one destination and offer any number of specialties
//! through the `hospital_specialties` junction table.

use medtour_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `hospitals` table with its destination name and specialty ids.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hospital {
    pub id: DbId,
    pub destination_id: DbId,
    pub destination_name: Option<String>,
    pub specialty_ids: Vec<DbId>,
    pub name: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub address: Option<String>,
    pub accreditations: Vec<String>,
    pub established_year: Option<i32>,
    pub bed_count: Option<i32>,
    pub rating: Option<f64>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateHospital {
    pub destination_id: DbId,
    #[serde(default)]
    pub specialty_ids: Vec<DbId>,
    pub name: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub address: Option<String>,
    pub accreditations: Option<Vec<String>>,
    pub established_year: Option<i32>,
    pub bed_count: Option<i32>,
    pub rating: Option<f64>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<String>,
}

/// Partial update. `specialty_ids`, when present, replaces the whole set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHospital {
    pub destination_id: Option<DbId>,
    pub specialty_ids: Option<Vec<DbId>>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub address: Option<String>,
    pub accreditations: Option<Vec<String>>,
    pub established_year: Option<i32>,
    pub bed_count: Option<i32>,
    pub rating: Option<f64>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HospitalFilter {
    pub destination_id: Option<DbId>,
    pub specialty_id: Option<DbId>,
}
