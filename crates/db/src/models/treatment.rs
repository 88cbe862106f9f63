//! Treatment (procedure) model and DTOs.

use medtour_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `treatments` table with its specialty's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Treatment {
    pub id: DbId,
    pub specialty_id: DbId,
    pub specialty_name: Option<String>,
    pub name: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    pub currency: String,
    pub duration: Option<String>,
    pub recovery_time: Option<String>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTreatment {
    pub specialty_id: DbId,
    pub name: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    /// Defaults to `USD`.
    pub currency: Option<String>,
    pub duration: Option<String>,
    pub recovery_time: Option<String>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTreatment {
    pub specialty_id: Option<DbId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    pub currency: Option<String>,
    pub duration: Option<String>,
    pub recovery_time: Option<String>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreatmentFilter {
    pub specialty_id: Option<DbId>,
}
