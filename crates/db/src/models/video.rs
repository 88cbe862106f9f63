//! Video model and DTOs.

use medtour_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub treatment_id: Option<DbId>,
    pub specialty_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    pub duration_secs: Option<i32>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub title: String,
    pub slug: Option<String>,
    pub url: String,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub treatment_id: Option<DbId>,
    pub specialty_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    pub duration_secs: Option<i32>,
    pub status: Option<String>,
}

/// Partial update. A link id of `0` clears that link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
    pub treatment_id: Option<DbId>,
    pub specialty_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
    pub duration_secs: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoFilter {
    pub treatment_id: Option<DbId>,
    pub specialty_id: Option<DbId>,
    pub hospital_id: Option<DbId>,
}
