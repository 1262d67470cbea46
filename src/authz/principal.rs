use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::app::AppState;
use crate::errors::AppError;
use crate::jwt::AuthUser;
use crate::models::account::{DbAccount, Role};
use crate::models::employee::DbEmployee;

/// An authenticated actor with its role and admin capability, resolved from
/// the store on every request. Extraction fails with `unauthenticated` when
/// the token is missing or bad, and `not_found` when the token is valid but
/// the account row is gone (an integrity error for well-formed accounts).
#[derive(Debug, Clone)]
pub struct Principal {
    pub account_id: Uuid,
    pub role: Role,
    pub is_admin: bool,
}

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    role: Role,
    is_admin: bool,
}

impl Principal {
    pub fn is_supervisor(&self) -> bool {
        self.role == Role::Supervisor
    }

    pub fn is_employee(&self) -> bool {
        self.role == Role::Employee
    }

    pub async fn resolve(pool: &SqlitePool, account_id: Uuid) -> Result<Self, AppError> {
        let row = sqlx::query_as::<_, PrincipalRow>(
            "SELECT role, is_admin FROM accounts WHERE id = ?",
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("no account for authenticated identity"))?;

        Ok(Principal {
            account_id,
            role: row.role,
            is_admin: row.is_admin,
        })
    }

    /// The caller's role-specific record (employee extension with balance
    /// and assignment). `not_found` if this principal is not an employee.
    pub async fn employee_record(&self, pool: &SqlitePool) -> Result<DbEmployee, AppError> {
        employee_record(pool, self.account_id).await
    }

    pub async fn supervisor_record(&self, pool: &SqlitePool) -> Result<DbAccount, AppError> {
        let account = sqlx::query_as::<_, DbAccount>(
            "SELECT id, email, first_name, last_name, national_id, phone_number, role, is_admin, password_hash, member_since \
             FROM accounts WHERE id = ? AND role = 'supervisor'",
        )
        .bind(self.account_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("no supervisor record for account"))?;

        Ok(account)
    }
}

/// Role-specific lookup for an arbitrary account id.
pub async fn employee_record(pool: &SqlitePool, account_id: Uuid) -> Result<DbEmployee, AppError> {
    let employee = sqlx::query_as::<_, DbEmployee>(
        "SELECT a.id, a.email, a.first_name, a.last_name, a.national_id, a.phone_number, a.member_since, \
                e.supervisor_id, e.leave_balance \
         FROM accounts a \
         INNER JOIN employees e ON e.account_id = a.id \
         WHERE a.id = ?",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("no employee record for account"))?;

    Ok(employee)
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        Principal::resolve(&state.pool, auth.account_id).await
    }
}
