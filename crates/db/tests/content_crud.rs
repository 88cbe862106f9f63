//! Integration tests for the content repositories.
//!
//! Exercises the repository layer against a real database:
//! - Create the specialty -> treatment / destination -> hospital -> doctor graph
//! - Junction-table writes and replacement
//! - Unique and foreign-key constraint violations
//! - Listing filters, search and pagination
//! - Dependency scan and bulk status changes

use medtour_core::cpt::ContentType;
use medtour_core::dependencies::check_deletion;
use medtour_db::listing::{ListParams, ListQuery};
use medtour_db::models::blog_post::{CreateBlogPost, UpdateBlogPost};
use medtour_db::models::destination::CreateDestination;
use medtour_db::models::doctor::{CreateDoctor, DoctorFilter, UpdateDoctor};
use medtour_db::models::hospital::{CreateHospital, HospitalFilter, UpdateHospital};
use medtour_db::models::specialty::{CreateSpecialty, UpdateSpecialty};
use medtour_db::models::treatment::{CreateTreatment, TreatmentFilter};
use medtour_db::repositories::{
    BlogPostRepo, ContentRepo, DependencyRepo, DestinationRepo, DoctorRepo, HospitalRepo,
    SpecialtyRepo, TreatmentRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_specialty(name: &str, slug: &str) -> CreateSpecialty {
    CreateSpecialty {
        name: name.to_string(),
        slug: Some(slug.to_string()),
        description: None,
        icon: None,
        sort_order: None,
        status: None,
    }
}

fn new_treatment(specialty_id: i64, name: &str, slug: &str) -> CreateTreatment {
    CreateTreatment {
        specialty_id,
        name: name.to_string(),
        slug: Some(slug.to_string()),
        summary: None,
        content: None,
        price_from: Some(4000.0),
        price_to: Some(9000.0),
        currency: None,
        duration: None,
        recovery_time: None,
        featured_image: None,
        meta_title: None,
        meta_description: None,
        status: None,
    }
}

fn new_destination(name: &str, slug: &str) -> CreateDestination {
    CreateDestination {
        name: name.to_string(),
        slug: Some(slug.to_string()),
        country: "India".to_string(),
        city: None,
        summary: None,
        content: None,
        featured_image: None,
        meta_title: None,
        meta_description: None,
        status: None,
    }
}

fn new_hospital(destination_id: i64, name: &str, slug: &str, specialty_ids: Vec<i64>) -> CreateHospital {
    CreateHospital {
        destination_id,
        specialty_ids,
        name: name.to_string(),
        slug: Some(slug.to_string()),
        summary: None,
        content: None,
        address: None,
        accreditations: Some(vec!["JCI".to_string()]),
        established_year: None,
        bed_count: None,
        rating: None,
        featured_image: None,
        meta_title: None,
        meta_description: None,
        status: None,
    }
}

fn new_doctor(name: &str, slug: &str) -> CreateDoctor {
    CreateDoctor {
        hospital_id: None,
        destination_id: None,
        specialty_id: None,
        treatment_ids: Vec::new(),
        name: name.to_string(),
        slug: Some(slug.to_string()),
        title: None,
        qualifications: None,
        experience_years: None,
        bio: None,
        photo: None,
        languages: None,
        meta_title: None,
        meta_description: None,
        status: None,
    }
}

fn new_post(title: &str, slug: &str, status: Option<&str>) -> CreateBlogPost {
    CreateBlogPost {
        title: title.to_string(),
        slug: Some(slug.to_string()),
        excerpt: None,
        content: None,
        featured_image: None,
        category: None,
        tags: None,
        specialty_id: None,
        published_at: None,
        meta_title: None,
        meta_description: None,
        status: status.map(str::to_string),
    }
}

fn params(ct: ContentType) -> ListParams {
    ListParams::resolve(ct, &ListQuery::default()).unwrap()
}

fn pg_code(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|e| e.code())
        .map(|c| c.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_content_graph(pool: PgPool) {
    let cardio = SpecialtyRepo::create(&pool, &new_specialty("Cardiology", "cardiology"))
        .await
        .unwrap();
    assert_eq!(cardio.status, "draft");
    assert_eq!(cardio.sort_order, 0);

    let bypass = TreatmentRepo::create(&pool, &new_treatment(cardio.id, "Bypass", "bypass"))
        .await
        .unwrap();
    assert_eq!(bypass.specialty_name.as_deref(), Some("Cardiology"));
    assert_eq!(bypass.currency, "USD");

    let delhi = DestinationRepo::create(&pool, &new_destination("Delhi", "delhi"))
        .await
        .unwrap();
    let hospital = HospitalRepo::create(
        &pool,
        &new_hospital(delhi.id, "Apollo", "apollo", vec![cardio.id]),
    )
    .await
    .unwrap();
    assert_eq!(hospital.destination_name.as_deref(), Some("Delhi"));
    assert_eq!(hospital.specialty_ids, vec![cardio.id]);
    assert_eq!(hospital.accreditations, vec!["JCI".to_string()]);

    let mut input = new_doctor("Dr. Rao", "dr-rao");
    input.hospital_id = Some(hospital.id);
    input.specialty_id = Some(cardio.id);
    input.treatment_ids = vec![bypass.id];
    let doctor = DoctorRepo::create(&pool, &input).await.unwrap();
    assert_eq!(doctor.hospital_name.as_deref(), Some("Apollo"));
    assert_eq!(doctor.treatment_ids, vec![bypass.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_is_unique_violation(pool: PgPool) {
    SpecialtyRepo::create(&pool, &new_specialty("Oncology", "oncology"))
        .await
        .unwrap();
    let err = SpecialtyRepo::create(&pool, &new_specialty("Oncology 2", "oncology"))
        .await
        .unwrap_err();
    assert_eq!(pg_code(&err).as_deref(), Some("23505"));
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_specialties_slug")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_specialty_is_fk_violation(pool: PgPool) {
    let err = TreatmentRepo::create(&pool, &new_treatment(999_999, "Ghost", "ghost"))
        .await
        .unwrap_err();
    assert_eq!(pg_code(&err).as_deref(), Some("23503"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_junction_write_rolls_back_with_parent(pool: PgPool) {
    let delhi = DestinationRepo::create(&pool, &new_destination("Delhi", "delhi"))
        .await
        .unwrap();
    let result = HospitalRepo::create(
        &pool,
        &new_hospital(delhi.id, "Max", "max", vec![999_999]),
    )
    .await;
    assert!(result.is_err(), "Unknown specialty id should fail the whole create");
    assert!(HospitalRepo::find_by_slug(&pool, "max").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_junction_set(pool: PgPool) {
    let a = SpecialtyRepo::create(&pool, &new_specialty("A", "a")).await.unwrap();
    let b = SpecialtyRepo::create(&pool, &new_specialty("B", "b")).await.unwrap();
    let delhi = DestinationRepo::create(&pool, &new_destination("Delhi", "delhi"))
        .await
        .unwrap();
    let hospital = HospitalRepo::create(&pool, &new_hospital(delhi.id, "H", "h", vec![a.id]))
        .await
        .unwrap();

    let updated = HospitalRepo::update(
        &pool,
        hospital.id,
        &UpdateHospital {
            specialty_ids: Some(vec![b.id]),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.specialty_ids, vec![b.id]);
    assert_eq!(updated.name, "H");

    // Omitting the id list leaves links untouched.
    let renamed = HospitalRepo::update(
        &pool,
        hospital.id,
        &UpdateHospital {
            name: Some("H2".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(renamed.specialty_ids, vec![b.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_zero_clears_optional_link(pool: PgPool) {
    let spec = SpecialtyRepo::create(&pool, &new_specialty("Ortho", "ortho")).await.unwrap();
    let mut input = new_doctor("Dr. Li", "dr-li");
    input.specialty_id = Some(spec.id);
    let doctor = DoctorRepo::create(&pool, &input).await.unwrap();

    let cleared = DoctorRepo::update(
        &pool,
        doctor.id,
        &UpdateDoctor {
            specialty_id: Some(0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(cleared.specialty_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_row_returns_none(pool: PgPool) {
    let result = SpecialtyRepo::update(
        &pool,
        424_242,
        &UpdateSpecialty {
            name: Some("X".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_search_and_pagination(pool: PgPool) {
    let cardio = SpecialtyRepo::create(&pool, &new_specialty("Cardiology", "cardiology"))
        .await
        .unwrap();
    let ortho = SpecialtyRepo::create(&pool, &new_specialty("Orthopedics", "orthopedics"))
        .await
        .unwrap();
    for (i, name) in ["Knee Replacement", "Hip Replacement", "Spine Fusion"].iter().enumerate() {
        TreatmentRepo::create(&pool, &new_treatment(ortho.id, name, &format!("t-{i}")))
            .await
            .unwrap();
    }
    TreatmentRepo::create(&pool, &new_treatment(cardio.id, "Bypass", "bypass"))
        .await
        .unwrap();

    let by_specialty = TreatmentRepo::list(
        &pool,
        &params(ContentType::Treatment),
        &TreatmentFilter {
            specialty_id: Some(ortho.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(by_specialty.total, 3);

    let query = ListQuery {
        q: Some("replacement".into()),
        sort: Some("name".into()),
        order: Some("asc".into()),
        limit: Some(1),
        ..Default::default()
    };
    let page = TreatmentRepo::list(
        &pool,
        &ListParams::resolve(ContentType::Treatment, &query).unwrap(),
        &TreatmentFilter::default(),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Hip Replacement");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_junction_filters(pool: PgPool) {
    let spec = SpecialtyRepo::create(&pool, &new_specialty("Dental", "dental")).await.unwrap();
    let treatment = TreatmentRepo::create(&pool, &new_treatment(spec.id, "Implant", "implant"))
        .await
        .unwrap();
    let dest = DestinationRepo::create(&pool, &new_destination("Goa", "goa")).await.unwrap();
    HospitalRepo::create(&pool, &new_hospital(dest.id, "With", "with", vec![spec.id]))
        .await
        .unwrap();
    HospitalRepo::create(&pool, &new_hospital(dest.id, "Without", "without", vec![]))
        .await
        .unwrap();
    let mut doc = new_doctor("Dr. Implant", "dr-implant");
    doc.treatment_ids = vec![treatment.id];
    DoctorRepo::create(&pool, &doc).await.unwrap();
    DoctorRepo::create(&pool, &new_doctor("Dr. Other", "dr-other")).await.unwrap();

    let hospitals = HospitalRepo::list(
        &pool,
        &params(ContentType::Hospital),
        &HospitalFilter {
            specialty_id: Some(spec.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(hospitals.total, 1);
    assert_eq!(hospitals.items[0].name, "With");

    let doctors = DoctorRepo::list(
        &pool,
        &params(ContentType::Doctor),
        &DoctorFilter {
            treatment_id: Some(treatment.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(doctors.total, 1);
    assert_eq!(doctors.items[0].name, "Dr. Implant");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dependency_scan_counts_and_examples(pool: PgPool) {
    let spec = SpecialtyRepo::create(&pool, &new_specialty("Ortho", "ortho")).await.unwrap();
    for (name, slug) in [("Knee Replacement", "knee"), ("Hip Replacement", "hip")] {
        TreatmentRepo::create(&pool, &new_treatment(spec.id, name, slug))
            .await
            .unwrap();
    }
    let dest = DestinationRepo::create(&pool, &new_destination("Goa", "goa")).await.unwrap();
    HospitalRepo::create(&pool, &new_hospital(dest.id, "Fortis", "fortis", vec![spec.id]))
        .await
        .unwrap();

    let groups = DependencyRepo::scan(&pool, ContentType::Specialty, spec.id)
        .await
        .unwrap();
    let treatments = groups.iter().find(|g| g.entity == "treatments").unwrap();
    assert_eq!(treatments.count, 2);
    assert_eq!(treatments.examples, vec!["Hip Replacement", "Knee Replacement"]);
    let hospitals = groups.iter().find(|g| g.entity == "hospitals").unwrap();
    assert_eq!(hospitals.examples, vec!["Fortis"]);

    let check = check_deletion("specialty", groups);
    assert!(!check.is_safe);
    assert!(check.message.contains("2 treatments"));
    assert!(check.message.contains("1 hospital (Fortis)"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hospital_delete_cascades_junction(pool: PgPool) {
    let spec = SpecialtyRepo::create(&pool, &new_specialty("ENT", "ent")).await.unwrap();
    let dest = DestinationRepo::create(&pool, &new_destination("Goa", "goa")).await.unwrap();
    let hospital = HospitalRepo::create(&pool, &new_hospital(dest.id, "H", "h", vec![spec.id]))
        .await
        .unwrap();

    assert!(ContentRepo::delete(&pool, ContentType::Hospital, hospital.id).await.unwrap());
    let groups = DependencyRepo::scan(&pool, ContentType::Specialty, spec.id)
        .await
        .unwrap();
    assert!(groups.iter().all(|g| g.count == 0));
    assert!(ContentRepo::delete(&pool, ContentType::Specialty, spec.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bulk_publish_stamps_blog_posts(pool: PgPool) {
    let a = BlogPostRepo::create(&pool, &new_post("A", "a", None), None).await.unwrap();
    let b = BlogPostRepo::create(&pool, &new_post("B", "b", None), None).await.unwrap();
    assert!(a.published_at.is_none());

    let updated = ContentRepo::set_status(&pool, ContentType::BlogPost, &[a.id, b.id, 9_999], "published")
        .await
        .unwrap();
    assert_eq!(updated.len(), 2);

    let a = BlogPostRepo::find_by_id(&pool, a.id).await.unwrap().unwrap();
    assert_eq!(a.status, "published");
    assert!(a.published_at.is_some());

    let remaining = ContentRepo::existing_ids(&pool, ContentType::BlogPost, &[a.id, b.id, 9_999])
        .await
        .unwrap();
    assert_eq!(remaining.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publishing_via_update_sets_published_at(pool: PgPool) {
    let created = BlogPostRepo::create(&pool, &new_post("Draft", "draft", Some("published")), None)
        .await
        .unwrap();
    assert!(created.published_at.is_some());

    let draft = BlogPostRepo::create(&pool, &new_post("Later", "later", None), None)
        .await
        .unwrap();
    let published = BlogPostRepo::update(
        &pool,
        draft.id,
        &UpdateBlogPost {
            status: Some("published".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(published.published_at.is_some());
}
