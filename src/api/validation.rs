//! Input checks and extractor error mapping.

use actix_web::{
    HttpRequest,
    error::{JsonPayloadError, QueryPayloadError},
};
use regex::Regex;

use crate::errors::AppError;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
}

/// bcrypt only looks at the first 72 bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn ensure_max_len(value: &str, max: usize) -> bool {
    value.len() <= max
}

/// Lower-cased, trimmed form under which emails are stored and looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected query for {}: {}", req.path(), err);
    AppError::InvalidInput(err.to_string()).into()
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected body for {}: {}", req.path(), err);
    AppError::InvalidInput(err.to_string()).into()
}
