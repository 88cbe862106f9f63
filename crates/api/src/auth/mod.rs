//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`cookie`] -- The `token` session cookie.
//! - [`throttle`] -- Per-IP failed-login throttling.

pub mod cookie;
pub mod jwt;
pub mod password;
pub mod throttle;
