//! Inbound-reference scan run before a hard delete.

use medtour_core::cpt::ContentType;
use medtour_core::dependencies::DependentGroup;
use medtour_core::types::DbId;
use sqlx::PgPool;

/// Number of example labels collected per referencing entity.
pub const EXAMPLE_LIMIT: i64 = 5;

pub struct DependencyRepo;

impl DependencyRepo {
    /// Count rows referencing `(ct, id)` for every dependent rule of `ct`,
    /// with up to [`EXAMPLE_LIMIT`] labels each. Groups with no rows are
    /// included with a zero count.
    pub async fn scan(
        pool: &PgPool,
        ct: ContentType,
        id: DbId,
    ) -> Result<Vec<DependentGroup>, sqlx::Error> {
        let mut groups = Vec::with_capacity(ct.dependents().len());
        for dep in ct.dependents() {
            let count: i64 = sqlx::query_scalar(&dep.count_sql())
                .bind(id)
                .fetch_one(pool)
                .await?;
            let examples: Vec<String> = if count > 0 {
                sqlx::query_scalar(&dep.examples_sql(EXAMPLE_LIMIT))
                    .bind(id)
                    .fetch_all(pool)
                    .await?
            } else {
                Vec::new()
            };
            groups.push(DependentGroup {
                entity: dep.entity.to_string(),
                count,
                examples,
            });
        }
        tracing::debug!(entity = ct.entity_type(), id, groups = groups.len(), "Dependency scan");
        Ok(groups)
    }
}
