use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{api::context::Role, config::Config, errors::AppError};

/// Session token payload. `sub` is the user's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<Role>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(email: &str, roles: Vec<Role>, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: email.to_string(),
            roles,
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
        }
    }
}

pub fn issue_token(config: &Config, email: &str, roles: Vec<Role>) -> Result<String, AppError> {
    let claims = Claims::new(email, roles, config.effective_jwt_expiry_hours());
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Returns the claims of a valid, unexpired token signed with our secret.
pub fn verify_token(config: &Config, token: &str) -> Option<Claims> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    match decode::<Claims>(token, &key, &Validation::default()) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            log::debug!("Rejected session token: {}", e);
            None
        }
    }
}
