use utoipa::OpenApi;

use crate::{
    api::{
        articles, auth, context, help_requests, helpers, menu_item_reviews,
        recommendation_requests,
    },
    database::models::{
        articles as articles_model, help_request, menu_item_review, recommendation_request,
    },
    errors::ErrorResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::csrf_token,
        auth::login,
        auth::logout,
        auth::current_user,
        // Help requests
        help_requests::all_help_requests,
        help_requests::get_help_request_by_id,
        help_requests::post_help_request,
        help_requests::update_help_request,
        help_requests::delete_help_request,
        // Articles
        articles::all_articles,
        articles::get_article_by_id,
        articles::post_article,
        articles::update_article,
        articles::delete_article,
        // Menu item reviews
        menu_item_reviews::all_menu_item_reviews,
        menu_item_reviews::get_menu_item_review_by_id,
        menu_item_reviews::post_menu_item_review,
        menu_item_reviews::update_menu_item_review,
        menu_item_reviews::delete_menu_item_review,
        // Recommendation requests
        recommendation_requests::all_recommendation_requests,
        recommendation_requests::get_recommendation_request_by_id,
        recommendation_requests::post_recommendation_request,
        recommendation_requests::update_recommendation_request,
        recommendation_requests::delete_recommendation_request,
    ),
    components(
        schemas(
            // --- Models ---
            help_request::Model,
            articles_model::Model,
            menu_item_review::Model,
            recommendation_request::Model,

            // --- DTOs & API Structs ---
            help_requests::HelpRequestBody,
            articles::ArticleBody,
            menu_item_reviews::MenuItemReviewBody,
            recommendation_requests::RecommendationRequestBody,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::CsrfTokenResponse,
            context::Principal,
            context::Role,
            helpers::MessageResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Login, logout, CSRF token and current user"),
        (name = "HelpRequests", description = "Help requests raised during lab sections"),
        (name = "Articles", description = "Shared article links"),
        (name = "MenuItemReviews", description = "Reviews of dining commons menu items"),
        (name = "RecommendationRequests", description = "Requests for letters of recommendation")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::{RefOr, schema::Schema};

    fn required_fields(doc: &utoipa::openapi::OpenApi, name: &str) -> Vec<String> {
        let components = doc.components.as_ref().expect("components");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(object))) => object.required.clone(),
            other => panic!("{} is not an object schema: {:?}", name, other),
        }
    }

    #[test]
    fn update_bodies_require_only_their_timestamps() {
        let doc = ApiDoc::openapi();

        assert_eq!(required_fields(&doc, "HelpRequestBody"), vec!["requestTime"]);
        assert_eq!(required_fields(&doc, "ArticleBody"), vec!["dateAdded"]);
        assert_eq!(required_fields(&doc, "MenuItemReviewBody"), vec!["dateReviewed"]);
        assert_eq!(
            required_fields(&doc, "RecommendationRequestBody"),
            vec!["dateRequested", "dateNeeded"]
        );
    }

    #[test]
    fn every_resource_path_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for path in [
            "/api/HelpRequests",
            "/api/HelpRequests/all",
            "/api/HelpRequests/post",
            "/api/articles",
            "/api/articles/all",
            "/api/articles/post",
            "/api/menuitemreview",
            "/api/menuitemreview/all",
            "/api/menuitemreview/post",
            "/api/recommendationrequest",
            "/api/recommendationrequest/all",
            "/api/recommendationrequest/post",
            "/api/currentUser",
        ] {
            assert!(paths.contains(&path), "missing {}", path);
        }
    }
}
