pub mod auth;
pub mod employees;
pub mod health;
pub mod leave_requests;
pub mod profile;
pub mod supervisors;

use sqlx::SqlitePool;

use crate::errors::{AppError, AppResult};

/// Pre-insert uniqueness check shared by both signup flows. The UNIQUE
/// constraints remain the source of truth; this just yields a friendlier
/// message for the common case.
pub(crate) async fn ensure_identity_available(
    pool: &SqlitePool,
    email: &str,
    national_id: &str,
) -> AppResult<()> {
    let email_taken: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM accounts WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;
    if email_taken > 0 {
        return Err(AppError::uniqueness_violation("email already registered"));
    }

    let national_id_taken: i64 =
        sqlx::query_scalar("SELECT COUNT(1) FROM accounts WHERE national_id = ?")
            .bind(national_id)
            .fetch_one(pool)
            .await?;
    if national_id_taken > 0 {
        return Err(AppError::uniqueness_violation(
            "national id already registered",
        ));
    }

    Ok(())
}

/// Maps a constraint failure raced past the pre-check onto the same 409.
pub(crate) fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.message().contains("UNIQUE constraint failed") {
            return AppError::uniqueness_violation("email or national id already registered");
        }
    }
    AppError::Database(err)
}
