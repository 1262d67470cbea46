use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Approved and Rejected are terminal; the state machine is one-way.
    pub fn is_terminal(self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

/// Target status of a transition request. Pending is not a legal target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaveDecision {
    Approved,
    Rejected,
}

impl LeaveDecision {
    pub fn as_status(self) -> LeaveStatus {
        match self {
            LeaveDecision::Approved => LeaveStatus::Approved,
            LeaveDecision::Rejected => LeaveStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbLeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    #[schema(format = Date, example = "2025-11-10")]
    pub start_date: NaiveDate,
    #[schema(format = Date, example = "2025-11-14")]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbLeaveRequest> for LeaveRequest {
    type Error = AppError;

    fn try_from(value: DbLeaveRequest) -> Result<Self, Self::Error> {
        Ok(LeaveRequest {
            id: value.id,
            employee_id: value.employee_id,
            start_date: value.start_date,
            end_date: value.end_date,
            reason: value.reason,
            status: value.status,
            created_at: value.created_at,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveCreateRequest {
    #[schema(format = Date, example = "2025-11-10")]
    pub start_date: NaiveDate,
    #[schema(format = Date, example = "2025-11-14")]
    pub end_date: NaiveDate,
    #[schema(example = "family visit")]
    pub reason: Option<String>,
    /// Required for admin callers, who file on behalf of an employee;
    /// employees always file for themselves.
    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: LeaveDecision,
}
