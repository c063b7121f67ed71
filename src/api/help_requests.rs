use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDateTime;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::helpers::{IdQuery, MessageResponse, find_or_not_found},
    app_state::AppState,
    database::models::help_request,
    errors::AppError,
    repositories::CrudRepository,
};

const RESOURCE: &str = "HelpRequest";

// --- DTOs ---

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CreateHelpRequestParams {
    pub requester_email: String,
    pub team_id: String,
    pub table_or_breakout_room: String,
    /// ISO-8601 local date-time, e.g. `2022-01-03T00:00:00`
    #[param(value_type = String, format = DateTime)]
    pub request_time: NaiveDateTime,
    pub explanation: String,
    pub solved: bool,
}

impl CreateHelpRequestParams {
    fn into_model(self) -> help_request::Model {
        help_request::Model {
            id: 0,
            requester_email: self.requester_email,
            team_id: self.team_id,
            table_or_breakout_room: self.table_or_breakout_room,
            request_time: self.request_time,
            explanation: self.explanation,
            solved: self.solved,
        }
    }
}

/// Replacement record for PUT; any `id` in the body is ignored.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequestBody {
    #[serde(default)]
    pub requester_email: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub table_or_breakout_room: String,
    /// Required. Unlike the other fields it has no default, so omitting it is a 400.
    #[schema(value_type = String, format = DateTime)]
    pub request_time: NaiveDateTime,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub solved: bool,
}

impl HelpRequestBody {
    fn apply_to(self, record: &mut help_request::Model) {
        record.requester_email = self.requester_email;
        record.team_id = self.team_id;
        record.table_or_breakout_room = self.table_or_breakout_room;
        record.request_time = self.request_time;
        record.explanation = self.explanation;
        record.solved = self.solved;
    }
}

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/api/HelpRequests/all",
    tag = "HelpRequests",
    responses(
        (status = 200, description = "List all help requests", body = [help_request::Model]),
        (status = 403, description = "Not logged in")
    )
)]
#[get("/all")]
pub async fn all_help_requests(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let help_requests = data.repositories.help_requests.find_all().await?;
    Ok(HttpResponse::Ok().json(help_requests))
}

#[utoipa::path(
    get,
    path = "/api/HelpRequests",
    tag = "HelpRequests",
    params(IdQuery),
    responses(
        (status = 200, description = "Help request found", body = help_request::Model),
        (status = 404, description = "Help request not found")
    )
)]
#[get("")]
pub async fn get_help_request_by_id(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let help_request: help_request::Model =
        find_or_not_found(data.repositories.help_requests.as_ref(), RESOURCE, query.id).await?;
    Ok(HttpResponse::Ok().json(help_request))
}

#[utoipa::path(
    post,
    path = "/api/HelpRequests/post",
    tag = "HelpRequests",
    params(CreateHelpRequestParams),
    responses(
        (status = 200, description = "Help request created", body = help_request::Model),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 403, description = "Admin role required")
    )
)]
#[post("/post")]
pub async fn post_help_request(
    data: web::Data<AppState>,
    params: web::Query<CreateHelpRequestParams>,
) -> Result<HttpResponse, AppError> {
    let saved = data
        .repositories
        .help_requests
        .save(params.into_inner().into_model())
        .await?;
    log::info!("Created {} with id {}", RESOURCE, saved.id);
    Ok(HttpResponse::Ok().json(saved))
}

#[utoipa::path(
    put,
    path = "/api/HelpRequests",
    tag = "HelpRequests",
    params(IdQuery),
    request_body = HelpRequestBody,
    responses(
        (status = 200, description = "Help request updated", body = help_request::Model),
        (status = 404, description = "Help request not found")
    )
)]
#[put("")]
pub async fn update_help_request(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
    body: web::Json<HelpRequestBody>,
) -> Result<HttpResponse, AppError> {
    let repository = data.repositories.help_requests.as_ref();
    let mut help_request: help_request::Model =
        find_or_not_found(repository, RESOURCE, query.id).await?;

    body.into_inner().apply_to(&mut help_request);

    let updated = repository.save(help_request).await?;
    log::info!("Updated {} with id {}", RESOURCE, updated.id);
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/HelpRequests",
    tag = "HelpRequests",
    params(IdQuery),
    responses(
        (status = 200, description = "Help request deleted", body = MessageResponse),
        (status = 404, description = "Help request not found")
    )
)]
#[delete("")]
pub async fn delete_help_request(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let repository = data.repositories.help_requests.as_ref();
    let help_request: help_request::Model =
        find_or_not_found(repository, RESOURCE, query.id).await?;

    repository.delete_by_id(help_request.id).await?;
    log::info!("Deleted {} with id {}", RESOURCE, help_request.id);
    Ok(HttpResponse::Ok().json(MessageResponse::deleted(RESOURCE, help_request.id)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/HelpRequests")
            .service(all_help_requests)
            .service(post_help_request)
            .service(get_help_request_by_id)
            .service(update_help_request)
            .service(delete_help_request),
    );
}
