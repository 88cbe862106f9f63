//! Dashboard aggregate rows.

use serde::Serialize;
use sqlx::FromRow;

use crate::models::activity::ActivityEntry;

/// Number of rows of one content type in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub entity: String,
    pub status: String,
    pub count: i64,
}

/// Per content type totals for the dashboard cards.
#[derive(Debug, Clone, Serialize)]
pub struct ContentSummary {
    pub key: &'static str,
    pub label: &'static str,
    pub draft: i64,
    pub published: i64,
    pub archived: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub content: Vec<ContentSummary>,
    pub new_submissions: i64,
    pub media_count: i64,
    pub recent_activity: Vec<ActivityEntry>,
}
