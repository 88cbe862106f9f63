//! Repository for the `testimonials` table.

use medtour_core::types::DbId;
use sqlx::PgPool;

use crate::listing::{fetch_page, BindValue, ListFilter, ListParams, Page};
use crate::models::testimonial::{
    CreateTestimonial, Testimonial, TestimonialFilter, UpdateTestimonial,
};

const COLUMNS: &str = "t.id, t.patient_name, t.patient_country, \
    t.treatment_id, (SELECT tr.name FROM treatments tr WHERE tr.id = t.treatment_id) AS treatment_name, \
    t.hospital_id, (SELECT h.name FROM hospitals h WHERE h.id = t.hospital_id) AS hospital_name, \
    t.doctor_id, (SELECT d.name FROM doctors d WHERE d.id = t.doctor_id) AS doctor_name, \
    t.rating, t.content, t.photo, t.video_url, t.status, t.created_at, t.updated_at";

pub struct TestimonialRepo;

impl TestimonialRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTestimonial,
    ) -> Result<Testimonial, sqlx::Error> {
        let query = format!(
            "INSERT INTO testimonials AS t \
                (patient_name, patient_country, treatment_id, hospital_id, doctor_id, \
                 rating, content, photo, video_url, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'draft')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(&input.patient_name)
            .bind(&input.patient_country)
            .bind(input.treatment_id)
            .bind(input.hospital_id)
            .bind(input.doctor_id)
            .bind(input.rating)
            .bind(&input.content)
            .bind(&input.photo)
            .bind(&input.video_url)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM testimonials t WHERE t.id = $1");
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        params: &ListParams,
        filter: &TestimonialFilter,
    ) -> Result<Page<Testimonial>, sqlx::Error> {
        let mut where_ = ListFilter::from_params(params);
        where_.eq_id("t.treatment_id", filter.treatment_id);
        where_.eq_id("t.hospital_id", filter.hospital_id);
        where_.eq_id("t.doctor_id", filter.doctor_id);
        if let Some(rating) = filter.rating {
            where_.push("t.rating = {}", BindValue::SmallInt(rating));
        }
        fetch_page(
            pool,
            COLUMNS,
            "testimonials t",
            &where_,
            &params.order_by(),
            params.limit,
            params.offset,
        )
        .await
    }

    /// Partial update. Link ids of `0` clear the link.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTestimonial,
    ) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!(
            "UPDATE testimonials t SET \
                patient_name = COALESCE($2, patient_name), \
                patient_country = COALESCE($3, patient_country), \
                treatment_id = NULLIF(COALESCE($4, treatment_id), 0), \
                hospital_id = NULLIF(COALESCE($5, hospital_id), 0), \
                doctor_id = NULLIF(COALESCE($6, doctor_id), 0), \
                rating = COALESCE($7, rating), \
                content = COALESCE($8, content), \
                photo = COALESCE($9, photo), \
                video_url = COALESCE($10, video_url), \
                status = COALESCE($11, status) \
             WHERE t.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .bind(&input.patient_name)
            .bind(&input.patient_country)
            .bind(input.treatment_id)
            .bind(input.hospital_id)
            .bind(input.doctor_id)
            .bind(input.rating)
            .bind(&input.content)
            .bind(&input.photo)
            .bind(&input.video_url)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }
}
