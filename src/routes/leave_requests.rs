use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::app::AppState;
use crate::authz::{self, ListScope, Principal};
use crate::errors::{AppError, AppResult};
use crate::leave::{lifecycle, validation};
use crate::models::leave_request::{
    DbLeaveRequest, LeaveCreateRequest, LeaveRequest, StatusUpdateRequest,
};
use crate::utils::utc_now;

const REQUEST_COLUMNS: &str =
    "id, employee_id, start_date, end_date, reason, status, created_at";

#[utoipa::path(
    post,
    path = "/api/leave-requests",
    tag = "Leave requests",
    request_body = LeaveCreateRequest,
    responses(
        (status = 201, description = "Leave request filed", body = LeaveRequest),
        (status = 403, description = "Caller may not file for this employee"),
        (status = 422, description = "Invalid date range or overlapping request")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<LeaveCreateRequest>,
) -> AppResult<(StatusCode, Json<LeaveRequest>)> {
    // Employees file for themselves; an admin must name the owner.
    let owner_id = if principal.is_employee() && !principal.is_admin {
        principal.account_id
    } else {
        payload
            .employee_id
            .ok_or_else(|| AppError::bad_request("employee_id is required"))?
    };

    if !authz::can_create_leave_request(&principal, owner_id) {
        return Err(AppError::permission_denied(
            "leave requests can only be filed for yourself",
        ));
    }

    // The owner must exist and be an employee.
    authz::employee_record(&state.pool, owner_id).await?;

    let existing = requests_of_employee(&state.pool, owner_id).await?;
    validation::validate(None, payload.start_date, payload.end_date, &existing)?;

    let request_id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO leave_requests (id, employee_id, start_date, end_date, reason, status, created_at) \
         VALUES (?, ?, ?, ?, ?, 'pending', ?)",
    )
    .bind(request_id)
    .bind(owner_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(&payload.reason)
    .bind(utc_now())
    .execute(&state.pool)
    .await?;

    let request: LeaveRequest = fetch_request(&state.pool, request_id).await?.try_into()?;

    tracing::info!(request_id = %request_id, employee_id = %owner_id, "leave request filed");

    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/leave-requests",
    tag = "Leave requests",
    responses(
        (status = 200, description = "Leave requests visible to the caller", body = [LeaveRequest])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    let rows = match authz::leave_list_scope(&principal) {
        ListScope::All => {
            sqlx::query_as::<_, DbLeaveRequest>(&format!(
                "SELECT {REQUEST_COLUMNS} FROM leave_requests ORDER BY created_at"
            ))
            .fetch_all(&state.pool)
            .await?
        }
        ListScope::AssignedTo(supervisor_id) => {
            sqlx::query_as::<_, DbLeaveRequest>(
                "SELECT r.id, r.employee_id, r.start_date, r.end_date, r.reason, r.status, r.created_at \
                 FROM leave_requests r \
                 INNER JOIN employees e ON e.account_id = r.employee_id \
                 WHERE e.supervisor_id = ? \
                 ORDER BY r.created_at",
            )
            .bind(supervisor_id)
            .fetch_all(&state.pool)
            .await?
        }
        ListScope::OwnedBy(employee_id) => requests_of_employee(&state.pool, employee_id).await?,
        ListScope::Nothing => Vec::new(),
    };

    let requests: Vec<LeaveRequest> = rows
        .into_iter()
        .map(LeaveRequest::try_from)
        .collect::<Result<_, _>>()?;

    Ok(Json(requests))
}

#[utoipa::path(
    put,
    path = "/api/leave-requests/{id}/status",
    tag = "Leave requests",
    params(("id" = Uuid, Path, description = "Leave request id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated leave request", body = LeaveRequest),
        (status = 403, description = "Caller is not the assigned supervisor"),
        (status = 409, description = "Request already finalized"),
        (status = 422, description = "Employee has no leave days left")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<LeaveRequest>> {
    let request = fetch_request(&state.pool, id).await?;
    let owner = authz::employee_record(&state.pool, request.employee_id).await?;

    if !authz::can_transition(&principal, owner.supervisor_id) {
        return Err(AppError::permission_denied(
            "only the assigned supervisor or an admin may decide this request",
        ));
    }

    lifecycle::apply(&state.pool, &request, payload.status).await?;

    let updated: LeaveRequest = fetch_request(&state.pool, id).await?.try_into()?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/leave-requests/{id}",
    tag = "Leave requests",
    params(("id" = Uuid, Path, description = "Leave request id")),
    responses(
        (status = 204, description = "Leave request deleted"),
        (status = 403, description = "Caller does not own this request"),
        (status = 409, description = "Request is no longer pending")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let request = fetch_request(&state.pool, id).await?;

    if !authz::can_delete(&principal, request.employee_id) {
        return Err(AppError::permission_denied(
            "only the owning employee may delete a leave request",
        ));
    }

    lifecycle::delete_pending(&state.pool, &request).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_request(pool: &SqlitePool, id: Uuid) -> AppResult<DbLeaveRequest> {
    sqlx::query_as::<_, DbLeaveRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("leave request not found"))
}

async fn requests_of_employee(
    pool: &SqlitePool,
    employee_id: Uuid,
) -> AppResult<Vec<DbLeaveRequest>> {
    let rows = sqlx::query_as::<_, DbLeaveRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM leave_requests WHERE employee_id = ? ORDER BY created_at"
    ))
    .bind(employee_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
