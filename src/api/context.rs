use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header};
use futures_util::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    config::Config,
    database::models::user,
    errors::AppError,
    services::tokens::{self, Claims},
};

/// Cookie carrying the session token issued at login.
pub const SESSION_COOKIE: &str = "SESSION";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

/// The authenticated caller, attached to the request by the access gate.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Principal {
    pub email: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            roles: claims.roles,
        }
    }
}

impl FromRequest for Principal {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Principal>()
                .cloned()
                .ok_or_else(AppError::access_denied),
        )
    }
}

/// Roles granted to a stored user: USER always, ADMIN from the row or the configured list.
pub fn roles_for(user: &user::Model, config: &Config) -> Vec<Role> {
    let mut roles = vec![Role::User];
    if user.admin || config.is_admin_email(&user.email) {
        roles.push(Role::Admin);
    }
    roles
}

/// Session token from `Authorization: Bearer ...`, falling back to the session cookie.
fn session_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

/// Resolves the caller from the request; `None` means anonymous.
pub fn resolve_principal(req: &HttpRequest, config: &Config) -> Option<Principal> {
    let token = session_token(req)?;
    tokens::verify_token(config, &token).map(Principal::from)
}
