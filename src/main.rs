use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use std::io;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use coursework_crud::{
    api::{
        self,
        docs::ApiDoc,
        middleware::{AccessGate, RequestId},
    },
    app_state::AppState,
    config::Config,
    database,
    repositories::Repositories,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| io::Error::other(format!("Failed to load configuration: {}", e)))?;

    let repositories = match config.database_url.as_deref() {
        Some(url) => {
            let db = database::connect_from_url(url).await?;
            if config.effective_auto_create_schema() {
                database::ensure_tables(&db)
                    .await
                    .map_err(|e| io::Error::other(format!("Failed to create schema: {}", e)))?;
            }
            log::info!("Connected to database");
            Repositories::sea_orm(db)
        }
        None => {
            log::warn!("DATABASE_URL is not set; records are kept in memory and lost on exit");
            Repositories::in_memory()
        }
    };

    let state = web::Data::new(AppState::new(config.clone(), repositories));
    let max_body_bytes = config.effective_max_body_bytes();
    let host = config.host.clone();
    let port = config.port;

    log::info!("Starting server at http://{}:{}", host, port);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AccessGate)
            .wrap(RequestId)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .service(web::scope("/api").configure(api::configure(max_body_bytes)))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
