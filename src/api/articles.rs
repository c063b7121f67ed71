use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDateTime;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::helpers::{IdQuery, MessageResponse, find_or_not_found},
    app_state::AppState,
    database::models::articles,
    errors::AppError,
    repositories::CrudRepository,
};

const RESOURCE: &str = "Articles";

// --- DTOs ---

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CreateArticleParams {
    pub title: String,
    pub url: String,
    pub explanation: String,
    pub email: String,
    /// ISO-8601 local date-time, e.g. `2022-01-03T00:00:00`
    #[param(value_type = String, format = DateTime)]
    pub date_added: NaiveDateTime,
}

impl CreateArticleParams {
    fn into_model(self) -> articles::Model {
        articles::Model {
            id: 0,
            title: self.title,
            url: self.url,
            explanation: self.explanation,
            email: self.email,
            date_added: self.date_added,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub email: String,
    /// Required. Unlike the other fields it has no default, so omitting it is a 400.
    #[schema(value_type = String, format = DateTime)]
    pub date_added: NaiveDateTime,
}

impl ArticleBody {
    fn apply_to(self, article: &mut articles::Model) {
        article.title = self.title;
        article.url = self.url;
        article.explanation = self.explanation;
        article.email = self.email;
        article.date_added = self.date_added;
    }
}

// --- Route Handlers ---

#[utoipa::path(
    get,
    path = "/api/articles/all",
    tag = "Articles",
    responses(
        (status = 200, description = "List all articles", body = [articles::Model]),
        (status = 403, description = "Not logged in")
    )
)]
#[get("/all")]
pub async fn all_articles(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let articles = data.repositories.articles.find_all().await?;
    Ok(HttpResponse::Ok().json(articles))
}

#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "Articles",
    params(IdQuery),
    responses(
        (status = 200, description = "Article found", body = articles::Model),
        (status = 404, description = "Article not found")
    )
)]
#[get("")]
pub async fn get_article_by_id(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let article: articles::Model =
        find_or_not_found(data.repositories.articles.as_ref(), RESOURCE, query.id).await?;
    Ok(HttpResponse::Ok().json(article))
}

#[utoipa::path(
    post,
    path = "/api/articles/post",
    tag = "Articles",
    params(CreateArticleParams),
    responses(
        (status = 200, description = "Article created", body = articles::Model),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 403, description = "Admin role required")
    )
)]
#[post("/post")]
pub async fn post_article(
    data: web::Data<AppState>,
    params: web::Query<CreateArticleParams>,
) -> Result<HttpResponse, AppError> {
    let saved = data
        .repositories
        .articles
        .save(params.into_inner().into_model())
        .await?;
    log::info!("Created {} with id {}", RESOURCE, saved.id);
    Ok(HttpResponse::Ok().json(saved))
}

#[utoipa::path(
    put,
    path = "/api/articles",
    tag = "Articles",
    params(IdQuery),
    request_body = ArticleBody,
    responses(
        (status = 200, description = "Article updated", body = articles::Model),
        (status = 404, description = "Article not found")
    )
)]
#[put("")]
pub async fn update_article(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
    body: web::Json<ArticleBody>,
) -> Result<HttpResponse, AppError> {
    let repository = data.repositories.articles.as_ref();
    let mut article: articles::Model = find_or_not_found(repository, RESOURCE, query.id).await?;

    body.into_inner().apply_to(&mut article);

    let updated = repository.save(article).await?;
    log::info!("Updated {} with id {}", RESOURCE, updated.id);
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/articles",
    tag = "Articles",
    params(IdQuery),
    responses(
        (status = 200, description = "Article deleted", body = MessageResponse),
        (status = 404, description = "Article not found")
    )
)]
#[delete("")]
pub async fn delete_article(
    data: web::Data<AppState>,
    query: web::Query<IdQuery>,
) -> Result<HttpResponse, AppError> {
    let repository = data.repositories.articles.as_ref();
    let article: articles::Model = find_or_not_found(repository, RESOURCE, query.id).await?;

    repository.delete_by_id(article.id).await?;
    log::info!("Deleted {} with id {}", RESOURCE, article.id);
    Ok(HttpResponse::Ok().json(MessageResponse::deleted(RESOURCE, article.id)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/articles")
            .service(all_articles)
            .service(post_article)
            .service(get_article_by_id)
            .service(update_article)
            .service(delete_article),
    );
}
