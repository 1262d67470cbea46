use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{self, ListScope, Principal};
use crate::errors::{AppError, AppResult};
use crate::models::employee::{DbEmployee, Employee, EmployeeSignupRequest};
use crate::routes::{ensure_identity_available, map_unique_violation};
use crate::utils::{hash_password, normalize_email, utc_now, validate_national_id};

const EMPLOYEE_COLUMNS: &str =
    "a.id, a.email, a.first_name, a.last_name, a.national_id, a.phone_number, a.member_since, \
     e.supervisor_id, e.leave_balance";

#[utoipa::path(
    post,
    path = "/api/employees/signup",
    tag = "Employees",
    request_body = EmployeeSignupRequest,
    responses(
        (status = 201, description = "Employee account created", body = Employee),
        (status = 403, description = "Caller may not onboard employees"),
        (status = 409, description = "Email or national id already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn signup(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<EmployeeSignupRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    if !authz::can_create_employee(&principal) {
        return Err(AppError::permission_denied(
            "only supervisors and admins may onboard employees",
        ));
    }

    let email = normalize_email(&payload.email)?;
    validate_national_id(&payload.national_id)?;
    let password_hash = hash_password(&payload.password)?;

    // A supervisor always becomes the assigned supervisor of the employees
    // they onboard; an admin may name one or leave the employee unassigned.
    let supervisor_id = if principal.is_admin {
        match payload.supervisor_id {
            Some(id) => {
                ensure_supervisor_exists(&state.pool, id).await?;
                Some(id)
            }
            None => None,
        }
    } else {
        Some(principal.account_id)
    };

    ensure_identity_available(&state.pool, &email, &payload.national_id).await?;

    let account_id = Uuid::new_v4();
    let now = utc_now();

    // Base account and the role extension land together or not at all.
    let mut tx = state.pool.begin().await?;

    sqlx::query(
        "INSERT INTO accounts (id, email, first_name, last_name, national_id, phone_number, role, is_admin, password_hash, member_since) \
         VALUES (?, ?, ?, ?, ?, ?, 'employee', 0, ?, ?)",
    )
    .bind(account_id)
    .bind(&email)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.national_id)
    .bind(&payload.phone_number)
    .bind(&password_hash)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(map_unique_violation)?;

    sqlx::query("INSERT INTO employees (account_id, supervisor_id) VALUES (?, ?)")
        .bind(account_id)
        .bind(supervisor_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let employee: Employee = authz::employee_record(&state.pool, account_id)
        .await?
        .try_into()?;

    tracing::info!(account_id = %account_id, supervisor_id = ?supervisor_id, "employee registered");

    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    responses(
        (status = 200, description = "Employees visible to the caller", body = [Employee])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<Employee>>> {
    let rows = match authz::employee_list_scope(&principal) {
        ListScope::All => {
            sqlx::query_as::<_, DbEmployee>(&format!(
                "SELECT {EMPLOYEE_COLUMNS} FROM accounts a \
                 INNER JOIN employees e ON e.account_id = a.id \
                 ORDER BY a.member_since"
            ))
            .fetch_all(&state.pool)
            .await?
        }
        ListScope::AssignedTo(supervisor_id) => {
            sqlx::query_as::<_, DbEmployee>(&format!(
                "SELECT {EMPLOYEE_COLUMNS} FROM accounts a \
                 INNER JOIN employees e ON e.account_id = a.id \
                 WHERE e.supervisor_id = ? \
                 ORDER BY a.member_since"
            ))
            .bind(supervisor_id)
            .fetch_all(&state.pool)
            .await?
        }
        ListScope::OwnedBy(_) | ListScope::Nothing => Vec::new(),
    };

    let employees: Vec<Employee> = rows
        .into_iter()
        .map(Employee::try_from)
        .collect::<Result<_, _>>()?;

    Ok(Json(employees))
}

async fn ensure_supervisor_exists(pool: &SqlitePool, supervisor_id: Uuid) -> AppResult<()> {
    let found: i64 = sqlx::query_scalar(
        "SELECT COUNT(1) FROM accounts WHERE id = ? AND role = 'supervisor'",
    )
    .bind(supervisor_id)
    .fetch_one(pool)
    .await?;

    if found == 0 {
        return Err(AppError::not_found("supervisor not found"));
    }
    Ok(())
}
