//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//!   (plus display names of related rows where the Listing shows them)
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for partial updates
//! - A `Deserialize` filter struct for the type's Listing filters

pub mod activity;
pub mod blog_post;
pub mod dashboard;
pub mod destination;
pub mod doctor;
pub mod hospital;
pub mod media;
pub mod specialty;
pub mod static_page;
pub mod submission;
pub mod testimonial;
pub mod treatment;
pub mod user;
pub mod video;
