use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;

/// Principal role. Admin capability is a separate flag on the account so the
/// policy can check it first, independently of the role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Supervisor,
    Employee,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbAccount {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub is_admin: bool,
    pub password_hash: String,
    pub member_since: DateTime<Utc>,
}

/// Public account summary; never exposes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub member_since: DateTime<Utc>,
}

impl TryFrom<DbAccount> for Account {
    type Error = AppError;

    fn try_from(value: DbAccount) -> Result<Self, Self::Error> {
        Ok(Account {
            id: value.id,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            national_id: value.national_id,
            phone_number: value.phone_number,
            role: value.role,
            member_since: value.member_since,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SupervisorSignupRequest {
    #[schema(example = "grace@example.com")]
    pub email: String,
    #[schema(example = "Grace")]
    pub first_name: String,
    #[schema(example = "Hopper")]
    pub last_name: String,
    #[schema(example = "0123456789")]
    pub national_id: String,
    #[schema(example = "09121234567")]
    pub phone_number: Option<String>,
    #[schema(example = "S3cureP@ssw0rd")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "grace@example.com")]
    pub email: String,
    #[schema(example = "S3cureP@ssw0rd")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub account: Account,
}
