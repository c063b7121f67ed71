#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    cookie::Cookie,
    http::header,
    test::TestRequest,
};
use chrono::NaiveDateTime;

use coursework_crud::{
    api::{context::Role, csrf},
    app_state::AppState,
    config::Config,
    database::models::{articles, help_request, menu_item_review, recommendation_request, user},
    repositories::{InMemoryRepository, Repositories},
    services::tokens,
};

pub const MAX_BODY_BYTES: usize = 64 * 1024;
pub const CSRF_TOKEN: &str = "test-csrf-token";

/// Repository handles shared with the app under test, so tests can seed and inspect them.
pub struct TestContext {
    pub config: Config,
    pub help_requests: Arc<InMemoryRepository<help_request::Model>>,
    pub articles: Arc<InMemoryRepository<articles::Model>>,
    pub menu_item_reviews: Arc<InMemoryRepository<menu_item_review::Model>>,
    pub recommendation_requests: Arc<InMemoryRepository<recommendation_request::Model>>,
    pub users: Arc<InMemoryRepository<user::Model>>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            help_requests: Arc::new(InMemoryRepository::new()),
            articles: Arc::new(InMemoryRepository::new()),
            menu_item_reviews: Arc::new(InMemoryRepository::new()),
            recommendation_requests: Arc::new(InMemoryRepository::new()),
            users: Arc::new(InMemoryRepository::new()),
        }
    }

    pub fn state(&self) -> AppState {
        let repositories = Repositories {
            help_requests: self.help_requests.clone(),
            articles: self.articles.clone(),
            menu_item_reviews: self.menu_item_reviews.clone(),
            recommendation_requests: self.recommendation_requests.clone(),
            users: self.users.clone(),
        };
        AppState::new(self.config.clone(), repositories)
    }

    pub fn user_token(&self) -> String {
        self.token_for("user@ucsb.edu", vec![Role::User])
    }

    pub fn admin_token(&self) -> String {
        self.token_for("admin@ucsb.edu", vec![Role::User, Role::Admin])
    }

    pub fn token_for(&self, email: &str, roles: Vec<Role>) -> String {
        tokens::issue_token(&self.config, email, roles).expect("token")
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 8080,
        database_url: None,
        auto_create_schema: None,
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiry_hours: None,
        admin_emails: None,
        max_body_bytes: None,
    }
}

pub fn at(value: &str) -> NaiveDateTime {
    value.parse().expect("timestamp")
}

/// Adds a bearer token.
pub fn authed(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
}

/// Adds a bearer token plus a matching CSRF cookie and header.
pub fn authed_write(req: TestRequest, token: &str) -> TestRequest {
    authed(req, token)
        .cookie(Cookie::new(csrf::CSRF_COOKIE, CSRF_TOKEN))
        .insert_header((csrf::CSRF_HEADER, CSRF_TOKEN))
}

/// Builds the full application the way the server binary does.
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.state()))
                .wrap(coursework_crud::api::middleware::AccessGate)
                .wrap(coursework_crud::api::middleware::RequestId)
                .wrap(actix_web::middleware::NormalizePath::trim())
                .service(
                    actix_web::web::scope("/api").configure(coursework_crud::api::configure(
                        $crate::common::MAX_BODY_BYTES,
                    )),
                ),
        )
        .await
    };
}
