//! Domain logic for the medical-tourism CMS.
//!
//! Everything here is free of I/O so it can be shared by the repository
//! layer, the HTTP server, and unit tests.

pub mod bulk;
pub mod cpt;
pub mod csv;
pub mod dependencies;
pub mod document;
pub mod error;
pub mod listing;
pub mod media;
pub mod roles;
pub mod slug;
pub mod status;
pub mod types;
pub mod validation;
