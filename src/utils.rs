use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use rand_core::OsRng;

use crate::errors::AppError;

const MIN_PASSWORD_LENGTH: usize = 8;
const NATIONAL_ID_LENGTH: usize = 10;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::internal(format!("failed to hash password: {err}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|err| AppError::internal(format!("invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// National ids are fixed-width numeric strings.
pub fn validate_national_id(national_id: &str) -> Result<(), AppError> {
    if national_id.len() != NATIONAL_ID_LENGTH || !national_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::bad_request(format!(
            "national id must be exactly {} digits",
            NATIONAL_ID_LENGTH
        )));
    }
    Ok(())
}

pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_ascii_lowercase();
    // Minimal shape check; real deliverability is the mail system's problem.
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !well_formed {
        return Err(AppError::bad_request("email address is not well formed"));
    }
    Ok(email)
}

pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}
