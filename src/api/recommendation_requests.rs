use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDateTime;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::helpers::{IdQuery, MessageResponse, find_or_not_found},
    app_state::AppState,
    database::models::recommendation_request,
    errors::AppError,
    repositories::CrudRepository,
};

const RESOURCE: &str = "RecommendationRequest";

// --- DTOs ---

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CreateRecommendationRequestParams {
    pub requester_email: String,
    pub professor_email: String,
    pub explanation: String,
    /// ISO-8601 local date-time, e.g. `2022-01-03T00:00:00`
    #[param(value_type = String, format = DateTime)]
    pub date_requested: NaiveDateTime,
    #[param(value_type = String, format = DateTime)]
    pub date_needed: NaiveDateTime,
    pub done: bool,
}

impl CreateRecommendationRequestParams {
    fn into_model(self) -> recommendation_request::Model {
        recommendation_request::Model {
            id: 0,
            requester_email: self.requester_email,
            professor_email: self.professor_email,
            explanation: self.explanation,
            date_requested: self.date_requested,
            date_needed: self.date_needed,
            done: self.done,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequestBody {
    #[serde(default)]
    pub requester_email: String,
    #[serde(default)]
    pub professor_email: String,
    #[serde(default)]
    pub explanation: String,
    /// Required. Unlike the other fields it has no default, so omitting it is a 400.
    #[schema(value_type = String, format = DateTime)]
    pub date_requested: NaiveDateTime,
    /// Required. Unlike the other fields it has no default, so omitting it is a 400.
    #[schema(value_type = String, format = DateTime)]
    pub date_needed: NaiveDateTime,
    #[serde(default)]
    pub done: bool,
}

impl RecommendationRequestBody {
    fn apply_to(self, request: &mut recommendation_request::Model) {
        request.requester_email = self.requester_email;
        request.professor_email = self.professor_email;
        request.explanation = self.explanation;
        request.date_requested = self.date_requested;
        request.date_needed = self.date_needed;
        request.done = self.done;
    }
}

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/api/recommendationrequest/all",
    tag = "RecommendationRequests",
    responses(
        (status = 200, description = "List all recommendation requests", body = [recommendation_request::Model]),
        (status = 403, description = "Not logged in")
    )
)]
#[get("/all")]
pub async fn all_recommendation_requests(
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let requests = data.repositories.recommendation_requests.find_all().await?;
    Ok(HttpResponse::Ok().json(requests))
}

#[utoipa::path(
    get,
    path = "/api/recommendationrequest",
    tag = "RecommendationRequests",
    params(IdQuery),
    responses(
        (status = 200, description = "Recommendation request found", body = recommendation_request::Model),
        (status = 404, description = "Recommendation request not found")
    )
)]
#[get("")]
pub async fn get_recommendation_request_by_id(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let request: recommendation_request::Model = find_or_not_found(
        data.repositories.recommendation_requests.as_ref(),
        RESOURCE,
        query.id,
    )
    .await?;
    Ok(HttpResponse::Ok().json(request))
}

#[utoipa::path(
    post,
    path = "/api/recommendationrequest/post",
    tag = "RecommendationRequests",
    params(CreateRecommendationRequestParams),
    responses(
        (status = 200, description = "Recommendation request created", body = recommendation_request::Model),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 403, description = "Admin role required")
    )
)]
#[post("/post")]
pub async fn post_recommendation_request(
    data: web::Data<AppState>,
    params: web::Query<CreateRecommendationRequestParams>,
) -> Result<HttpResponse, AppError> {
    let saved = data
        .repositories
        .recommendation_requests
        .save(params.into_inner().into_model())
        .await?;
    log::info!("Created {} with id {}", RESOURCE, saved.id);
    Ok(HttpResponse::Ok().json(saved))
}

#[utoipa::path(
    put,
    path = "/api/recommendationrequest",
    tag = "RecommendationRequests",
    params(IdQuery),
    request_body = RecommendationRequestBody,
    responses(
        (status = 200, description = "Recommendation request updated", body = recommendation_request::Model),
        (status = 404, description = "Recommendation request not found")
    )
)]
#[put("")]
pub async fn update_recommendation_request(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
    body: web::Json<RecommendationRequestBody>,
) -> Result<HttpResponse, AppError> {
    let repository = data.repositories.recommendation_requests.as_ref();
    let mut request: recommendation_request::Model =
        find_or_not_found(repository, RESOURCE, query.id).await?;

    body.into_inner().apply_to(&mut request);

    let updated = repository.save(request).await?;
    log::info!("Updated {} with id {}", RESOURCE, updated.id);
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/recommendationrequest",
    tag = "RecommendationRequests",
    params(IdQuery),
    responses(
        (status = 200, description = "Recommendation request deleted", body = MessageResponse),
        (status = 404, description = "Recommendation request not found")
    )
)]
#[delete("")]
pub async fn delete_recommendation_request(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let repository = data.repositories.recommendation_requests.as_ref();
    let request: recommendation_request::Model =
        find_or_not_found(repository, RESOURCE, query.id).await?;

    repository.delete_by_id(request.id).await?;
    log::info!("Deleted {} with id {}", RESOURCE, request.id);
    Ok(HttpResponse::Ok().json(MessageResponse::deleted(RESOURCE, request.id)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/recommendationrequest")
            .service(all_recommendation_requests)
            .service(post_recommendation_request)
            .service(get_recommendation_request_by_id)
            .service(update_recommendation_request)
            .service(delete_recommendation_request),
    );
}
