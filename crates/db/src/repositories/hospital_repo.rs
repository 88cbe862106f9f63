//! Repository for the `hospitals` table and its `hospital_specialties` links.

use medtour_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::listing::{fetch_page, BindValue, ListFilter, ListParams, Page};
use crate::models::hospital::{CreateHospital, Hospital, HospitalFilter, UpdateHospital};

const COLUMNS: &str = "t.id, t.destination_id, \
    (SELECT d.name FROM destinations d WHERE d.id = t.destination_id) AS destination_name, \
    ARRAY(SELECT hs.specialty_id FROM hospital_specialties hs \
          WHERE hs.hospital_id = t.id ORDER BY hs.specialty_id) AS specialty_ids, \
    t.name, t.slug, t.summary, t.content, t.address, t.accreditations, \
    t.established_year, t.bed_count, t.rating, t.featured_image, \
    t.meta_title, t.meta_description, t.status, t.created_at, t.updated_at";

pub struct HospitalRepo;

impl HospitalRepo {
    /// Insert a hospital and its specialty links in one transaction.
    ///
    /// `input.specialty_ids` must already be de-duplicated.
    pub async fn create(pool: &PgPool, input: &CreateHospital) -> Result<Hospital, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO hospitals \
                (destination_id, name, slug, summary, content, address, accreditations, \
                 established_year, bed_count, rating, featured_image, meta_title, \
                 meta_description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '{}'::TEXT[]), \
                     $8, $9, $10, $11, $12, $13, COALESCE($14, 'draft')) \
             RETURNING id",
        )
        .bind(input.destination_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(&input.address)
        .bind(&input.accreditations)
        .bind(input.established_year)
        .bind(input.bed_count)
        .bind(input.rating)
        .bind(&input.featured_image)
        .bind(&input.meta_title)
        .bind(&input.meta_description)
        .bind(&input.status)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_specialties_inner(&mut tx, id, &input.specialty_ids).await?;
        let hospital = Self::fetch_in_tx(&mut tx, id).await?;

        tx.commit().await?;
        Ok(hospital)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Hospital>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hospitals t WHERE t.id = $1");
        sqlx::query_as::<_, Hospital>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Hospital>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hospitals t WHERE t.slug = $1");
        sqlx::query_as::<_, Hospital>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &HospitalFilter,
    ) -> Result<Page<Hospital>, sqlx::Error> {
        let mut where_ = ListFilter::from_params(params);
        where_.eq_id("t.destination_id", filter.destination_id);
        if let Some(specialty_id) = filter.specialty_id {
            where_.push(
                "EXISTS (SELECT 1 FROM hospital_specialties hs \
                 WHERE hs.hospital_id = t.id AND hs.specialty_id = {})",
                BindValue::BigInt(specialty_id),
            );
        }
        fetch_page(
            pool,
            COLUMNS,
            "hospitals t",
            &where_,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    /// Partial update. When `specialty_ids` is present the link set is replaced
    /// in the same transaction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHospital,
    ) -> Result<Option<Hospital>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE hospitals SET \
                destination_id = COALESCE($2, destination_id), \
                name = COALESCE($3, name), \
                slug = COALESCE($4, slug), \
                summary = COALESCE($5, summary), \
                content = COALESCE($6, content), \
                address = COALESCE($7, address), \
                accreditations = COALESCE($8, accreditations), \
                established_year = COALESCE($9, established_year), \
                bed_count = COALESCE($10, bed_count), \
                rating = COALESCE($11, rating), \
                featured_image = COALESCE($12, featured_image), \
                meta_title = COALESCE($13, meta_title), \
                meta_description = COALESCE($14, meta_description), \
                status = COALESCE($15, status) \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(input.destination_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(&input.address)
        .bind(&input.accreditations)
        .bind(input.established_year)
        .bind(input.bed_count)
        .bind(input.rating)
        .bind(&input.featured_image)
        .bind(&input.meta_title)
        .bind(&input.meta_description)
        .bind(&input.status)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = updated else {
            return Ok(None);
        };
        if let Some(ref specialty_ids) = input.specialty_ids {
            Self::set_specialties_inner(&mut tx, id, specialty_ids).await?;
        }
        let hospital = Self::fetch_in_tx(&mut tx, id).await?;

        tx.commit().await?;
        Ok(Some(hospital))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn set_specialties_inner(
        tx: &mut Transaction<'_, Postgres>,
        hospital_id: DbId,
        specialty_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM hospital_specialties WHERE hospital_id = $1")
            .bind(hospital_id)
            .execute(&mut **tx)
            .await?;

        if !specialty_ids.is_empty() {
            sqlx::query(
                "INSERT INTO hospital_specialties (hospital_id, specialty_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(hospital_id)
            .bind(specialty_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn fetch_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Hospital, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM hospitals t WHERE t.id = $1");
        sqlx::query_as::<_, Hospital>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }
}
