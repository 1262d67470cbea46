use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::account::{Account, AuthResponse, DbAccount, LoginRequest};
use crate::utils::verify_password;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = payload.email.trim().to_ascii_lowercase();

    let db_account = sqlx::query_as::<_, DbAccount>(
        "SELECT id, email, first_name, last_name, national_id, phone_number, role, is_admin, password_hash, member_since \
         FROM accounts WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::unauthenticated("invalid credentials"))?;

    if !verify_password(&payload.password, &db_account.password_hash)? {
        return Err(AppError::unauthenticated("invalid credentials"));
    }

    let token = state.jwt.encode(db_account.id)?;
    let account: Account = db_account.try_into()?;

    Ok(Json(AuthResponse { token, account }))
}
