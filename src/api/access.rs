//! Route-level access policy evaluated before handler dispatch.

use actix_web::http::Method;

use crate::api::context::Role;

/// API paths reachable without a session.
const PUBLIC_API_PATHS: &[&str] = &["/api/csrf", "/api/auth/login", "/api/auth/logout"];

/// Role a request needs, or `None` when the path is public.
///
/// `GET` and `HEAD` under `/api/` need USER, every other method there needs ADMIN.
/// `path` must be the decoded path the router matches on.
pub fn required_role(method: &Method, path: &str) -> Option<Role> {
    if !path.starts_with("/api/") || PUBLIC_API_PATHS.contains(&path) {
        return None;
    }

    if *method == Method::GET || *method == Method::HEAD {
        Some(Role::User)
    } else {
        Some(Role::Admin)
    }
}

pub fn is_state_changing(method: &Method) -> bool {
    ![Method::GET, Method::HEAD, Method::OPTIONS, Method::TRACE].contains(method)
}
