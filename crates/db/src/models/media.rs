//! Media library model and DTOs.

use medtour_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    /// Stored file name under the upload directory.
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub alt_text: Option<String>,
    pub url: String,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Row written after the file has been stored on disk.
#[derive(Debug, Clone)]
pub struct CreateMedia {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub alt_text: Option<String>,
    pub url: String,
    pub uploaded_by: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMedia {
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaFilter {
    /// `image` or `document`.
    pub kind: Option<String>,
}
