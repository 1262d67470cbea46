use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::authz::Principal;
use crate::errors::AppResult;
use crate::models::account::Account;
use crate::models::employee::Employee;

/// The caller's role-specific record.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ProfileResponse {
    Employee(Employee),
    Supervisor(Account),
}

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Role-specific record of the caller", body = ProfileResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<ProfileResponse>> {
    let profile = if principal.is_employee() {
        ProfileResponse::Employee(principal.employee_record(&state.pool).await?.try_into()?)
    } else {
        ProfileResponse::Supervisor(principal.supervisor_record(&state.pool).await?.try_into()?)
    };

    Ok(Json(profile))
}
