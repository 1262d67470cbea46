use sqlx::SqlitePool;

use crate::errors::{AppError, AppResult};
use crate::models::leave_request::{DbLeaveRequest, LeaveDecision};

/// Applies a supervisor decision to a pending request. Transitions out of a
/// terminal state always fail with `AlreadyFinalized`; authorization has
/// been checked by the caller.
pub async fn apply(
    pool: &SqlitePool,
    request: &DbLeaveRequest,
    decision: LeaveDecision,
) -> AppResult<()> {
    if request.status.is_terminal() {
        return Err(AppError::AlreadyFinalized);
    }

    match decision {
        LeaveDecision::Approved => approve(pool, request).await,
        LeaveDecision::Rejected => reject(pool, request).await,
    }
}

/// Approval spends one leave day. The status flip and the balance decrement
/// are guarded updates inside one transaction: either both apply or neither,
/// and of two racing approvals only the first finds the row still pending.
async fn approve(pool: &SqlitePool, request: &DbLeaveRequest) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let finalized = sqlx::query(
        "UPDATE leave_requests SET status = 'approved' WHERE id = ? AND status = 'pending'",
    )
    .bind(request.id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if finalized == 0 {
        tx.rollback().await?;
        return Err(AppError::AlreadyFinalized);
    }

    let decremented = sqlx::query(
        "UPDATE employees SET leave_balance = leave_balance - 1 \
         WHERE account_id = ? AND leave_balance > 0",
    )
    .bind(request.employee_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if decremented == 0 {
        tx.rollback().await?;
        return Err(AppError::InsufficientBalance);
    }

    tx.commit().await?;

    tracing::info!(request_id = %request.id, employee_id = %request.employee_id, "leave approved");
    Ok(())
}

/// Rejection is a status-only transition; the balance is untouched.
async fn reject(pool: &SqlitePool, request: &DbLeaveRequest) -> AppResult<()> {
    let finalized = sqlx::query(
        "UPDATE leave_requests SET status = 'rejected' WHERE id = ? AND status = 'pending'",
    )
    .bind(request.id)
    .execute(pool)
    .await?
    .rows_affected();

    if finalized == 0 {
        return Err(AppError::AlreadyFinalized);
    }

    tracing::info!(request_id = %request.id, employee_id = %request.employee_id, "leave rejected");
    Ok(())
}

/// Deletion is legal only while pending. The guard rides in the DELETE
/// itself so a concurrent approval cannot slip a finalized request away.
pub async fn delete_pending(pool: &SqlitePool, request: &DbLeaveRequest) -> AppResult<()> {
    if request.status.is_terminal() {
        return Err(AppError::NotDeletable);
    }

    let deleted = sqlx::query("DELETE FROM leave_requests WHERE id = ? AND status = 'pending'")
        .bind(request.id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotDeletable);
    }

    tracing::info!(request_id = %request.id, "pending leave request deleted");
    Ok(())
}
