//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- The session user, from the `token` cookie or a Bearer header.
//! - [`auth::ClientIp`] -- Client address for throttling and submissions.
//! - [`rbac::RequireAuth`] -- Any authenticated user.
//! - [`rbac::RequireEditor`] -- `editor` or `super_admin`.
//! - [`rbac::RequireSuperAdmin`] -- `super_admin` only.

pub mod auth;
pub mod rbac;
