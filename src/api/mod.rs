pub mod access;
pub mod articles;
pub mod auth;
pub mod context;
pub mod csrf;
pub mod docs;
pub mod help_requests;
pub mod helpers;
pub mod menu_item_reviews;
pub mod middleware;
pub mod recommendation_requests;
pub mod validation;

use actix_web::web;

/// Registers extractor limits and every `/api` route.
///
/// Mounted under the `/api` scope by the server binary and the integration tests alike.
pub fn configure(max_body_bytes: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::QueryConfig::default().error_handler(validation::query_error_handler))
            .app_data(
                web::JsonConfig::default()
                    .limit(max_body_bytes)
                    .error_handler(validation::json_error_handler),
            )
            .configure(auth::init_routes)
            .configure(help_requests::init_routes)
            .configure(articles::init_routes)
            .configure(menu_item_reviews::init_routes)
            .configure(recommendation_requests::init_routes);
    }
}
