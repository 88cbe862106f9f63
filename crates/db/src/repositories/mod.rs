//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod blog_post_repo;
pub mod content_repo;
pub mod dashboard_repo;
pub mod dependency_repo;
pub mod destination_repo;
pub mod doctor_repo;
pub mod hospital_repo;
pub mod media_repo;
pub mod specialty_repo;
pub mod static_page_repo;
pub mod submission_repo;
pub mod testimonial_repo;
pub mod treatment_repo;
pub mod user_repo;
pub mod video_repo;

pub use activity_repo::ActivityRepo;
pub use blog_post_repo::BlogPostRepo;
pub use content_repo::ContentRepo;
pub use dashboard_repo::DashboardRepo;
pub use dependency_repo::DependencyRepo;
pub use destination_repo::DestinationRepo;
pub use doctor_repo::DoctorRepo;
pub use hospital_repo::HospitalRepo;
pub use media_repo::MediaRepo;
pub use specialty_repo::SpecialtyRepo;
pub use static_page_repo::StaticPageRepo;
pub use submission_repo::SubmissionRepo;
pub use testimonial_repo::TestimonialRepo;
pub use treatment_repo::TreatmentRepo;
pub use user_repo::UserRepo;
pub use video_repo::VideoRepo;
