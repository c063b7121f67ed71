use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDateTime;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::helpers::{IdQuery, MessageResponse, find_or_not_found},
    app_state::AppState,
    database::models::menu_item_review,
    errors::AppError,
    repositories::CrudRepository,
};

const RESOURCE: &str = "MenuItemReview";

// --- DTOs ---

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CreateMenuItemReviewParams {
    pub item_id: i64,
    pub reviewer_email: String,
    pub stars: i32,
    /// ISO-8601 local date-time, e.g. `2022-01-03T00:00:00`
    #[param(value_type = String, format = DateTime)]
    pub date_reviewed: NaiveDateTime,
    pub comments: String,
}

impl CreateMenuItemReviewParams {
    fn into_model(self) -> menu_item_review::Model {
        menu_item_review::Model {
            id: 0,
            item_id: self.item_id,
            reviewer_email: self.reviewer_email,
            stars: self.stars,
            date_reviewed: self.date_reviewed,
            comments: self.comments,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemReviewBody {
    #[serde(default)]
    pub item_id: i64,
    #[serde(default)]
    pub reviewer_email: String,
    #[serde(default)]
    pub stars: i32,
    /// Required. Unlike the other fields it has no default, so omitting it is a 400.
    #[schema(value_type = String, format = DateTime)]
    pub date_reviewed: NaiveDateTime,
    #[serde(default)]
    pub comments: String,
}

impl MenuItemReviewBody {
    fn apply_to(self, review: &mut menu_item_review::Model) {
        review.item_id = self.item_id;
        review.reviewer_email = self.reviewer_email;
        review.stars = self.stars;
        review.date_reviewed = self.date_reviewed;
        review.comments = self.comments;
    }
}

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/api/menuitemreview/all",
    tag = "MenuItemReviews",
    responses(
        (status = 200, description = "List all menu item reviews", body = [menu_item_review::Model]),
        (status = 403, description = "Not logged in")
    )
)]
#[get("/all")]
pub async fn all_menu_item_reviews(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let reviews = data.repositories.menu_item_reviews.find_all().await?;
    Ok(HttpResponse::Ok().json(reviews))
}

#[utoipa::path(
    get,
    path = "/api/menuitemreview",
    tag = "MenuItemReviews",
    params(IdQuery),
    responses(
        (status = 200, description = "Review found", body = menu_item_review::Model),
        (status = 404, description = "Review not found")
    )
)]
#[get("")]
pub async fn get_menu_item_review_by_id(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let review: menu_item_review::Model = find_or_not_found(
        data.repositories.menu_item_reviews.as_ref(),
        RESOURCE,
        query.id,
    )
    .await?;
    Ok(HttpResponse::Ok().json(review))
}

#[utoipa::path(
    post,
    path = "/api/menuitemreview/post",
    tag = "MenuItemReviews",
    params(CreateMenuItemReviewParams),
    responses(
        (status = 200, description = "Review created", body = menu_item_review::Model),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 403, description = "Admin role required")
    )
)]
#[post("/post")]
pub async fn post_menu_item_review(
    data: web::Data<AppState>,
    params: web::Query<CreateMenuItemReviewParams>,
) -> Result<HttpResponse, AppError> {
    let saved = data
        .repositories
        .menu_item_reviews
        .save(params.into_inner().into_model())
        .await?;
    log::info!("Created {} with id {}", RESOURCE, saved.id);
    Ok(HttpResponse::Ok().json(saved))
}

#[utoipa::path(
    put,
    path = "/api/menuitemreview",
    tag = "MenuItemReviews",
    params(IdQuery),
    request_body = MenuItemReviewBody,
    responses(
        (status = 200, description = "Review updated", body = menu_item_review::Model),
        (status = 404, description = "Review not found")
    )
)]
#[put("")]
pub async fn update_menu_item_review(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
    body: web::Json<MenuItemReviewBody>,
) -> Result<HttpResponse, AppError> {
    let repository = data.repositories.menu_item_reviews.as_ref();
    let mut review: menu_item_review::Model =
        find_or_not_found(repository, RESOURCE, query.id).await?;

    body.into_inner().apply_to(&mut review);

    let updated = repository.save(review).await?;
    log::info!("Updated {} with id {}", RESOURCE, updated.id);
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/menuitemreview",
    tag = "MenuItemReviews",
    params(IdQuery),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 404, description = "Review not found")
    )
)]
#[delete("")]
pub async fn delete_menu_item_review(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let repository = data.repositories.menu_item_reviews.as_ref();
    let review: menu_item_review::Model =
        find_or_not_found(repository, RESOURCE, query.id).await?;

    repository.delete_by_id(review.id).await?;
    log::info!("Deleted {} with id {}", RESOURCE, review.id);
    Ok(HttpResponse::Ok().json(MessageResponse::deleted(RESOURCE, review.id)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/menuitemreview")
            .service(all_menu_item_reviews)
            .service(post_menu_item_review)
            .service(get_menu_item_review_by_id)
            .service(update_menu_item_review)
            .service(delete_menu_item_review),
    );
}
