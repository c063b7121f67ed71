#[macro_use]
mod common;

use actix_web::{cookie::Cookie, http::StatusCode, test};
use serde_json::{Value, json};

use common::{TestContext, at, authed, authed_write, test_config};
use coursework_crud::{
    api::{
        context::{Role, SESSION_COOKIE},
        csrf,
        middleware::REQUEST_ID_HEADER,
    },
    database::models::{help_request, user},
    services::passwords,
};

fn account(email: &str, password: &str, admin: bool) -> user::Model {
    user::Model {
        id: 0,
        email: email.to_string(),
        password_hash: passwords::hash_password(password, 4).unwrap(),
        admin,
    }
}

fn login(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
}

#[actix_web::test]
async fn csrf_endpoint_sets_the_cookie_and_describes_the_header() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/csrf").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == csrf::CSRF_COOKIE)
        .map(|c| c.value().to_string())
        .expect("csrf cookie");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["headerName"], "X-XSRF-TOKEN");
    assert_eq!(body["parameterName"], "_csrf");
    assert_eq!(body["token"], cookie.as_str());
}

#[actix_web::test]
async fn login_issues_a_session_usable_for_current_user() {
    let ctx = TestContext::new();
    ctx.users.seed([account("cgaucho@ucsb.edu", "hunter22", false)]);
    let app = init_app!(ctx);

    let resp = test::call_service(&app, login("CGaucho@ucsb.edu", "hunter22").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .expect("session cookie");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "cgaucho@ucsb.edu");
    assert_eq!(body["roles"], json!(["USER"]));
    assert_eq!(body["token"], session.as_str());

    let req = test::TestRequest::get()
        .uri("/api/currentUser")
        .cookie(Cookie::new(SESSION_COOKIE, session))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me, json!({ "email": "cgaucho@ucsb.edu", "roles": ["USER"] }));
}

#[actix_web::test]
async fn configured_admin_emails_receive_the_admin_role() {
    let mut config = test_config();
    config.admin_emails = Some("pconrad@ucsb.edu, phtcon@ucsb.edu".to_string());
    let ctx = TestContext::with_config(config);
    ctx.users.seed([account("phtcon@ucsb.edu", "s3cret", false)]);
    let app = init_app!(ctx);

    let body: Value =
        test::call_and_read_body_json(&app, login("phtcon@ucsb.edu", "s3cret").to_request()).await;
    assert_eq!(body["roles"], json!(["USER", "ADMIN"]));
}

#[actix_web::test]
async fn wrong_password_and_unknown_user_are_unauthorized() {
    let ctx = TestContext::new();
    ctx.users.seed([account("cgaucho@ucsb.edu", "hunter22", true)]);
    let app = init_app!(ctx);

    for req in [
        login("cgaucho@ucsb.edu", "hunter23"),
        login("nobody@ucsb.edu", "hunter22"),
    ] {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["type"], "BadCredentialsException");
    }
}

#[actix_web::test]
async fn malformed_login_email_is_a_bad_request() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let resp = test::call_service(&app, login("not-an-email", "pw").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn logout_clears_the_session_cookie() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/auth/logout").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("removal cookie");
    assert_eq!(cleared.value(), "");
}

#[actix_web::test]
async fn current_user_needs_a_session() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/currentUser").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["type"], "AccessDeniedException");
}

#[actix_web::test]
async fn tokens_signed_with_another_secret_are_anonymous() {
    let ctx = TestContext::new();
    let mut other = test_config();
    other.jwt_secret = "someone-else".to_string();
    let forged = TestContext::with_config(other).token_for("admin@ucsb.edu", vec![Role::User, Role::Admin]);
    let app = init_app!(ctx);

    let req = authed(test::TestRequest::get(), &forged)
        .uri("/api/HelpRequests/all")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(ctx.help_requests.calls().is_empty());
}

#[actix_web::test]
async fn writes_without_a_matching_csrf_token_are_forbidden() {
    let ctx = TestContext::new();
    ctx.help_requests.seed([help_request::Model {
        id: 0,
        requester_email: "cgaucho@ucsb.edu".to_string(),
        team_id: "s22-5pm-3".to_string(),
        table_or_breakout_room: "7".to_string(),
        request_time: at("2022-04-20T17:35:00"),
        explanation: "Need help".to_string(),
        solved: false,
    }]);
    let app = init_app!(ctx);
    let token = ctx.admin_token();

    let missing = authed(test::TestRequest::delete(), &token)
        .uri("/api/HelpRequests?id=1")
        .to_request();
    assert_eq!(test::call_service(&app, missing).await.status(), StatusCode::FORBIDDEN);

    let mismatched = authed(test::TestRequest::delete(), &token)
        .uri("/api/HelpRequests?id=1")
        .cookie(Cookie::new(csrf::CSRF_COOKIE, "one"))
        .insert_header((csrf::CSRF_HEADER, "two"))
        .to_request();
    assert_eq!(test::call_service(&app, mismatched).await.status(), StatusCode::FORBIDDEN);

    assert!(ctx.help_requests.calls().is_empty());
    assert_eq!(ctx.help_requests.len(), 1);
}

#[actix_web::test]
async fn every_response_carries_a_request_id() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let denied = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/articles/all").to_request(),
    )
    .await;
    let allowed = test::call_service(
        &app,
        authed(test::TestRequest::get(), &ctx.user_token())
            .uri("/api/articles/all")
            .to_request(),
    )
    .await;

    let first = denied.headers().get(REQUEST_ID_HEADER).expect("request id");
    let second = allowed.headers().get(REQUEST_ID_HEADER).expect("request id");
    assert_ne!(first, second);
}

#[actix_web::test]
async fn trailing_slashes_are_normalized() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = authed(test::TestRequest::get(), &ctx.user_token())
        .uri("/api/articles/all/")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn malformed_json_body_is_a_bad_request() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = authed_write(test::TestRequest::put(), &ctx.admin_token())
        .uri("/api/articles?id=1")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["type"], "IllegalArgumentException");
}

#[actix_web::test]
async fn percent_encoded_create_needs_admin_and_csrf() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);
    let create = "/%61pi/articles/post?title=x&url=u&explanation=e&email=a@ucsb.edu&dateAdded=2022-01-03T00:00:00";

    let anonymous = test::TestRequest::post().uri(create).to_request();
    assert_eq!(test::call_service(&app, anonymous).await.status(), StatusCode::FORBIDDEN);

    let without_csrf = authed(test::TestRequest::post(), &ctx.admin_token())
        .uri(create)
        .to_request();
    assert_eq!(test::call_service(&app, without_csrf).await.status(), StatusCode::FORBIDDEN);
    assert!(ctx.articles.saved().is_empty());

    let admin = authed_write(test::TestRequest::post(), &ctx.admin_token())
        .uri(create)
        .to_request();
    assert_eq!(test::call_service(&app, admin).await.status(), StatusCode::OK);
    assert_eq!(ctx.articles.saved().len(), 1);
}
