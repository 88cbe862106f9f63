//! Aggregates for the admin dashboard.

use medtour_core::cpt::PUBLISHABLE;
use sqlx::PgPool;

use crate::models::dashboard::{ContentSummary, Dashboard, StatusCount};
use crate::repositories::{ActivityRepo, MediaRepo, SubmissionRepo};

/// Activity rows shown on the dashboard.
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Status counts for every publishable type in one round trip.
    pub async fn status_counts(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        let query = PUBLISHABLE
            .iter()
            .map(|ct| {
                format!(
                    "SELECT '{}' AS entity, status, COUNT(*)::BIGINT AS count FROM {} GROUP BY status",
                    ct.key(),
                    ct.table()
                )
            })
            .collect::<Vec<_>>()
            .join(" UNION ALL ");
        sqlx::query_as::<_, StatusCount>(&query).fetch_all(pool).await
    }

    pub async fn load(pool: &PgPool) -> Result<Dashboard, sqlx::Error> {
        let counts = Self::status_counts(pool).await?;
        let content = PUBLISHABLE
            .iter()
            .map(|ct| {
                let count_of = |status: &str| {
                    counts
                        .iter()
                        .find(|c| c.entity == ct.key() && c.status == status)
                        .map_or(0, |c| c.count)
                };
                let draft = count_of("draft");
                let published = count_of("published");
                let archived = count_of("archived");
                ContentSummary {
                    key: ct.key(),
                    label: ct.label_plural(),
                    draft,
                    published,
                    archived,
                    total: draft + published + archived,
                }
            })
            .collect();

        Ok(Dashboard {
            content,
            new_submissions: SubmissionRepo::count_new(pool).await?,
            media_count: MediaRepo::count(pool).await?,
            recent_activity: ActivityRepo::recent(pool, RECENT_ACTIVITY_LIMIT).await?,
        })
    }
}
