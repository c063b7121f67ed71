use actix_web::{
    HttpRequest,
    cookie::{Cookie, SameSite},
};
use uuid::Uuid;

use crate::errors::AppError;

pub const CSRF_COOKIE: &str = "XSRF-TOKEN";
pub const CSRF_HEADER: &str = "X-XSRF-TOKEN";
pub const CSRF_PARAMETER: &str = "_csrf";

pub fn new_token() -> String {
    Uuid::new_v4().to_string()
}

/// Script-readable cookie holding the token the client must echo in [`CSRF_HEADER`].
pub fn token_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(CSRF_COOKIE, token.to_string())
        .path("/")
        .same_site(SameSite::Lax)
        .finish()
}

/// Double-submit check: header and cookie must both be present and equal.
pub fn verify(req: &HttpRequest) -> Result<(), AppError> {
    let cookie = req.cookie(CSRF_COOKIE);
    let header = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok());

    match (cookie, header) {
        (Some(cookie), Some(header))
            if !header.is_empty() && constant_time_eq(cookie.value(), header) =>
        {
            Ok(())
        }
        _ => {
            log::warn!("CSRF check failed for {} {}", req.method(), req.path());
            Err(AppError::Forbidden("Invalid CSRF token".to_string()))
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn matching_cookie_and_header_pass() {
        let req = TestRequest::post()
            .cookie(token_cookie("abc-123"))
            .insert_header((CSRF_HEADER, "abc-123"))
            .to_http_request();
        assert!(verify(&req).is_ok());
    }

    #[test]
    fn missing_or_mismatched_token_fails() {
        let header_only = TestRequest::post()
            .insert_header((CSRF_HEADER, "abc-123"))
            .to_http_request();
        assert!(verify(&header_only).is_err());

        let mismatched = TestRequest::post()
            .cookie(token_cookie("abc-123"))
            .insert_header((CSRF_HEADER, "abc-124"))
            .to_http_request();
        assert!(verify(&mismatched).is_err());
    }
}
