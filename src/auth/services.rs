use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Shared input checks for every path that creates an account.
pub(crate) fn validate_signup(email: &str, password: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::InvalidInput("invalid email".into()));
    }
    if password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::InvalidInput("password too short".into()));
    }
    Ok(())
}
