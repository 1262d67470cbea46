use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::app::AppState;
use crate::errors::AppResult;
use crate::models::account::{Account, DbAccount, SupervisorSignupRequest};
use crate::routes::{ensure_identity_available, map_unique_violation};
use crate::utils::{hash_password, normalize_email, utc_now, validate_national_id};

#[utoipa::path(
    post,
    path = "/api/supervisors/signup",
    tag = "Supervisors",
    request_body = SupervisorSignupRequest,
    responses(
        (status = 201, description = "Supervisor account created", body = Account),
        (status = 409, description = "Email or national id already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SupervisorSignupRequest>,
) -> AppResult<(StatusCode, Json<Account>)> {
    let email = normalize_email(&payload.email)?;
    validate_national_id(&payload.national_id)?;
    let password_hash = hash_password(&payload.password)?;

    ensure_identity_available(&state.pool, &email, &payload.national_id).await?;

    let account_id = Uuid::new_v4();
    let now = utc_now();

    sqlx::query(
        "INSERT INTO accounts (id, email, first_name, last_name, national_id, phone_number, role, is_admin, password_hash, member_since) \
         VALUES (?, ?, ?, ?, ?, ?, 'supervisor', 0, ?, ?)",
    )
    .bind(account_id)
    .bind(&email)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.national_id)
    .bind(&payload.phone_number)
    .bind(&password_hash)
    .bind(now)
    .execute(&state.pool)
    .await
    .map_err(map_unique_violation)?;

    let db_account = sqlx::query_as::<_, DbAccount>(
        "SELECT id, email, first_name, last_name, national_id, phone_number, role, is_admin, password_hash, member_since \
         FROM accounts WHERE id = ?",
    )
    .bind(account_id)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(account_id = %account_id, "supervisor registered");

    let account: Account = db_account.try_into()?;
    Ok((StatusCode::CREATED, Json(account)))
}
