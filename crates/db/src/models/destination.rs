//! Destination (country/city) model and DTOs.

use medtour_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `destinations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Destination {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub country: String,
    pub city: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDestination {
    pub name: String,
    pub slug: Option<String>,
    pub country: String,
    pub city: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDestination {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DestinationFilter {
    pub country: Option<String>,
}
