use actix_web::{HttpResponse, cookie::Cookie, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::{
        context::{self, Principal, Role, SESSION_COOKIE},
        csrf,
        helpers::MessageResponse,
        validation,
    },
    app_state::AppState,
    errors::AppError,
    repositories::UserRepository,
    services::{passwords, tokens},
};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub roles: Vec<Role>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub header_name: String,
    pub parameter_name: String,
    pub token: String,
}

#[utoipa::path(
    get,
    path = "/api/csrf",
    tag = "Auth",
    responses(
        (status = 200, description = "Fresh CSRF token, also set as the XSRF-TOKEN cookie", body = CsrfTokenResponse)
    )
)]
#[get("/csrf")]
pub async fn csrf_token() -> HttpResponse {
    let token = csrf::new_token();
    HttpResponse::Ok()
        .cookie(csrf::token_cookie(&token))
        .json(CsrfTokenResponse {
            header_name: csrf::CSRF_HEADER.to_string(),
            parameter_name: csrf::CSRF_PARAMETER.to_string(),
            token,
        })
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token, also set as the SESSION cookie", body = LoginResponse),
        (status = 400, description = "Malformed credentials"),
        (status = 401, description = "Bad credentials")
    )
)]
#[post("/auth/login")]
pub async fn login(
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = body.into_inner();
    let email = validation::normalize_email(&email);

    if !validation::validate_email(&email) {
        return Err(AppError::InvalidInput("Invalid email address".to_string()));
    }
    if !validation::ensure_max_len(&password, validation::MAX_PASSWORD_BYTES) {
        return Err(AppError::InvalidInput("Password is too long".to_string()));
    }

    let bad_credentials = || AppError::Unauthorized("Bad credentials".to_string());

    let user = data
        .repositories
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| {
            log::info!("Login for unknown user {}", email);
            bad_credentials()
        })?;

    if !passwords::verify_password(password, user.password_hash.clone()).await? {
        log::info!("Wrong password for {}", email);
        return Err(bad_credentials());
    }

    let roles = context::roles_for(&user, &data.config);
    let token = tokens::issue_token(&data.config, &user.email, roles.clone())?;
    log::info!("{} logged in with roles {:?}", user.email, roles);

    let cookie = Cookie::build(SESSION_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        token,
        email: user.email,
        roles,
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    )
)]
#[post("/auth/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/currentUser",
    tag = "Auth",
    responses(
        (status = 200, description = "The logged-in user", body = Principal),
        (status = 403, description = "Not logged in")
    )
)]
#[get("/currentUser")]
pub async fn current_user(principal: Principal) -> HttpResponse {
    HttpResponse::Ok().json(principal)
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(csrf_token)
        .service(login)
        .service(logout)
        .service(current_user);
}
