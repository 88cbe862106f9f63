pub mod activity;
pub mod auth;
pub mod blog_post;
pub mod content;
pub mod cpt;
pub mod dashboard;
pub mod destination;
pub mod doctor;
pub mod hospital;
pub mod import;
pub mod media;
pub mod pages;
pub mod public;
pub mod specialty;
pub mod static_page;
pub mod submission;
pub mod testimonial;
pub mod treatment;
pub mod user;
pub mod video;
