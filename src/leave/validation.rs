use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::leave_request::DbLeaveRequest;

/// Structural check on a candidate date range. The end must fall strictly
/// after the start; a zero-length range is not a leave.
pub fn validate_dates(start_date: NaiveDate, end_date: NaiveDate) -> AppResult<()> {
    if end_date <= start_date {
        return Err(AppError::InvalidDateRange);
    }
    Ok(())
}

/// Inclusive-range intersection against the employee's other requests.
/// Dates are whole days, so a request ending on day X conflicts with one
/// starting on day X. `own_id` excludes the record from comparison with
/// itself, keeping re-validation idempotent.
pub fn check_overlap(
    own_id: Option<Uuid>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    existing: &[DbLeaveRequest],
) -> AppResult<()> {
    for other in existing {
        if own_id == Some(other.id) {
            continue;
        }
        if other.start_date <= end_date && other.end_date >= start_date {
            return Err(AppError::OverlappingRequest);
        }
    }
    Ok(())
}

/// Full write-time validation: runs before every create and before any date
/// mutation, never on status-only transitions.
pub fn validate(
    own_id: Option<Uuid>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    existing: &[DbLeaveRequest],
) -> AppResult<()> {
    validate_dates(start_date, end_date)?;
    check_overlap(own_id, start_date, end_date, existing)
}
