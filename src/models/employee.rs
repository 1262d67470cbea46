use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::Role;

/// Joined row: account columns plus the employee extension.
#[derive(Debug, Clone, FromRow)]
pub struct DbEmployee {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone_number: Option<String>,
    pub member_since: DateTime<Utc>,
    pub supervisor_id: Option<Uuid>,
    pub leave_balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub member_since: DateTime<Utc>,
    /// Weak reference; cleared when the supervisor account is removed.
    pub supervisor_id: Option<Uuid>,
    pub leave_balance: i64,
}

impl TryFrom<DbEmployee> for Employee {
    type Error = AppError;

    fn try_from(value: DbEmployee) -> Result<Self, Self::Error> {
        Ok(Employee {
            id: value.id,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            national_id: value.national_id,
            phone_number: value.phone_number,
            role: Role::Employee,
            member_since: value.member_since,
            supervisor_id: value.supervisor_id,
            leave_balance: value.leave_balance,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeSignupRequest {
    #[schema(example = "alan@example.com")]
    pub email: String,
    #[schema(example = "Alan")]
    pub first_name: String,
    #[schema(example = "Turing")]
    pub last_name: String,
    #[schema(example = "9876543210")]
    pub national_id: String,
    #[schema(example = "09351234567")]
    pub phone_number: Option<String>,
    #[schema(example = "S3cureP@ssw0rd")]
    pub password: String,
    /// Honored only for admin callers; a supervisor always becomes the
    /// assigned supervisor of the employees they onboard.
    pub supervisor_id: Option<Uuid>,
}
