//! Repository for the `doctors` table and its `doctor_treatments` links.

use medtour_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::listing::{fetch_page, BindValue, ListFilter, ListParams, Page};
use crate::models::doctor::{CreateDoctor, Doctor, DoctorFilter, UpdateDoctor};

const COLUMNS: &str = "t.id, \
    t.hospital_id, (SELECT h.name FROM hospitals h WHERE h.id = t.hospital_id) AS hospital_name, \
    t.destination_id, \
    (SELECT d.name FROM destinations d WHERE d.id = t.destination_id) AS destination_name, \
    t.specialty_id, (SELECT s.name FROM specialties s WHERE s.id = t.specialty_id) AS specialty_name, \
    ARRAY(SELECT dt.treatment_id FROM doctor_treatments dt \
          WHERE dt.doctor_id = t.id ORDER BY dt.treatment_id) AS treatment_ids, \
    t.name, t.slug, t.title, t.qualifications, t.experience_years, t.bio, t.photo, \
    t.languages, t.meta_title, t.meta_description, t.status, t.created_at, t.updated_at";

pub struct DoctorRepo;

impl DoctorRepo {
    /// Insert a doctor and its treatment links in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateDoctor) -> Result<Doctor, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO doctors \
                (hospital_id, destination_id, specialty_id, name, slug, title, qualifications, \
                 experience_years, bio, photo, languages, meta_title, meta_description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, '{}'::TEXT[]), \
                     $12, $13, COALESCE($14, 'draft')) \
             RETURNING id",
        )
        .bind(input.hospital_id)
        .bind(input.destination_id)
        .bind(input.specialty_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.title)
        .bind(&input.qualifications)
        .bind(input.experience_years)
        .bind(&input.bio)
        .bind(&input.photo)
        .bind(&input.languages)
        .bind(&input.meta_title)
        .bind(&input.meta_description)
        .bind(&input.status)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_treatments_inner(&mut tx, id, &input.treatment_ids).await?;
        let doctor = Self::fetch_in_tx(&mut tx, id).await?;

        tx.commit().await?;
        Ok(doctor)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors t WHERE t.id = $1");
        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Doctor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors t WHERE t.slug = $1");
        sqlx::query_as::<_, Doctor>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &DoctorFilter,
    ) -> Result<Page<Doctor>, sqlx::Error> {
        let mut where_ = ListFilter::from_params(params);
        where_.eq_id("t.specialty_id", filter.specialty_id);
        where_.eq_id("t.hospital_id", filter.hospital_id);
        where_.eq_id("t.destination_id", filter.destination_id);
        if let Some(treatment_id) = filter.treatment_id {
            where_.push(
                "EXISTS (SELECT 1 FROM doctor_treatments dt \
                 WHERE dt.doctor_id = t.id AND dt.treatment_id = {})",
                BindValue::BigInt(treatment_id),
            );
        }
        fetch_page(
            pool,
            COLUMNS,
            "doctors t",
            &where_,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    /// Partial update. Link ids of `0` clear the link; `treatment_ids`, when
    /// present, replaces the treatment set in the same transaction.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDoctor,
    ) -> Result<Option<Doctor>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE doctors SET \
                hospital_id = NULLIF(COALESCE($2, hospital_id), 0), \
                destination_id = NULLIF(COALESCE($3, destination_id), 0), \
                specialty_id = NULLIF(COALESCE($4, specialty_id), 0), \
                name = COALESCE($5, name), \
                slug = COALESCE($6, slug), \
                title = COALESCE($7, title), \
                qualifications = COALESCE($8, qualifications), \
                experience_years = COALESCE($9, experience_years), \
                bio = COALESCE($10, bio), \
                photo = COALESCE($11, photo), \
                languages = COALESCE($12, languages), \
                meta_title = COALESCE($13, meta_title), \
                meta_description = COALESCE($14, meta_description), \
                status = COALESCE($15, status) \
             WHERE id = $1 \
             RETURNING id",
        )
        .bind(id)
        .bind(input.hospital_id)
        .bind(input.destination_id)
        .bind(input.specialty_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.title)
        .bind(&input.qualifications)
        .bind(input.experience_years)
        .bind(&input.bio)
        .bind(&input.photo)
        .bind(&input.languages)
        .bind(&input.meta_title)
        .bind(&input.meta_description)
        .bind(&input.status)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = updated else {
            return Ok(None);
        };
        if let Some(ref treatment_ids) = input.treatment_ids {
            Self::set_treatments_inner(&mut tx, id, treatment_ids).await?;
        }
        let doctor = Self::fetch_in_tx(&mut tx, id).await?;

        tx.commit().await?;
        Ok(Some(doctor))
    }

    async fn set_treatments_inner(
        tx: &mut Transaction<'_, Postgres>,
        doctor_id: DbId,
        treatment_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM doctor_treatments WHERE doctor_id = $1")
            .bind(doctor_id)
            .execute(&mut **tx)
            .await?;

        if !treatment_ids.is_empty() {
            sqlx::query(
                "INSERT INTO doctor_treatments (doctor_id, treatment_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(doctor_id)
            .bind(treatment_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn fetch_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Doctor, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM doctors t WHERE t.id = $1");
        sqlx::query_as::<_, Doctor>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }
}
