//! First-run seeding of the initial super admin account.

use medtour_core::roles::Role;
use medtour_db::models::user::CreateUser;
use medtour_db::repositories::UserRepo;
use medtour_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured super admin when the `users` table is empty.
///
/// Returns `true` when an account was created. Any existing user, of any
/// role, turns this into a no-op.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(false);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::BadRequest(format!("BOOTSTRAP_ADMIN_PASSWORD: {msg}")))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: admin.email.trim().to_string(),
            name: "Administrator".to_string(),
            password_hash,
            role: Role::SuperAdmin.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(id = user.id, email = %user.email, "Bootstrap super admin created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin(password: &str) -> BootstrapAdmin {
        BootstrapAdmin {
            email: "root@medtour.test".into(),
            password: password.into(),
        }
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn creates_admin_only_once(pool: DbPool) {
        assert!(ensure_admin(&pool, &admin("Sup3rSecret!")).await.unwrap());
        assert!(!ensure_admin(&pool, &admin("Sup3rSecret!")).await.unwrap());

        let user = UserRepo::find_by_email(&pool, "root@medtour.test")
            .await
            .unwrap()
            .expect("admin row");
        assert_eq!(user.role, "super_admin");
        assert!(user.is_active);
        assert_eq!(UserRepo::count(&pool).await.unwrap(), 1);
    }

    #[sqlx::test(migrations = "../../db/migrations")]
    async fn rejects_weak_password(pool: DbPool) {
        let result = ensure_admin(&pool, &admin("short")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(UserRepo::count(&pool).await.unwrap(), 0);
    }
}
