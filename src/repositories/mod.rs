//! Persistence contracts for every resource.
//!
//! Each resource gets the shared [`CrudRepository`] operations plus one finder of its own.
//! [`SeaOrmRepository`] backs them with a database, [`InMemoryRepository`] with a map.

pub mod memory;
pub mod seaorm;

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};

use crate::database::models::{
    articles, help_request, menu_item_review, recommendation_request, user,
};

pub use memory::{InMemoryRepository, RepositoryCall};
pub use seaorm::SeaOrmRepository;

/// A persisted row with a storage-assigned identifier.
///
/// An id of `0` means "not saved yet"; storage assigns the real id on first save.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

#[async_trait]
pub trait CrudRepository<M: Record>: Send + Sync {
    async fn find_all(&self) -> Result<Vec<M>, DbErr>;
    async fn find_by_id(&self, id: i64) -> Result<Option<M>, DbErr>;
    /// Inserts when `record.id() == 0`, otherwise overwrites the row with that id.
    async fn save(&self, record: M) -> Result<M, DbErr>;
    async fn delete_by_id(&self, id: i64) -> Result<(), DbErr>;
}

#[async_trait]
pub trait HelpRequestRepository: CrudRepository<help_request::Model> {
    async fn find_all_by_requester_email(
        &self,
        requester_email: &str,
    ) -> Result<Vec<help_request::Model>, DbErr>;
}

#[async_trait]
pub trait ArticlesRepository: CrudRepository<articles::Model> {
    async fn find_all_by_email(&self, email: &str) -> Result<Vec<articles::Model>, DbErr>;
}

#[async_trait]
pub trait MenuItemReviewRepository: CrudRepository<menu_item_review::Model> {
    async fn find_all_by_item_id(
        &self,
        item_id: i64,
    ) -> Result<Vec<menu_item_review::Model>, DbErr>;
}

#[async_trait]
pub trait RecommendationRequestRepository: CrudRepository<recommendation_request::Model> {
    async fn find_all_by_requester_email(
        &self,
        requester_email: &str,
    ) -> Result<Vec<recommendation_request::Model>, DbErr>;
}

#[async_trait]
pub trait UserRepository: CrudRepository<user::Model> {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr>;
}

/// One repository handle per resource, shared by all workers.
#[derive(Clone)]
pub struct Repositories {
    pub help_requests: Arc<dyn HelpRequestRepository>,
    pub articles: Arc<dyn ArticlesRepository>,
    pub menu_item_reviews: Arc<dyn MenuItemReviewRepository>,
    pub recommendation_requests: Arc<dyn RecommendationRequestRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn sea_orm(db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        Self {
            help_requests: Arc::new(SeaOrmRepository::<help_request::Entity>::new(Arc::clone(
                &db,
            ))),
            articles: Arc::new(SeaOrmRepository::<articles::Entity>::new(Arc::clone(&db))),
            menu_item_reviews: Arc::new(SeaOrmRepository::<menu_item_review::Entity>::new(
                Arc::clone(&db),
            )),
            recommendation_requests: Arc::new(
                SeaOrmRepository::<recommendation_request::Entity>::new(Arc::clone(&db)),
            ),
            users: Arc::new(SeaOrmRepository::<user::Entity>::new(db)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            help_requests: Arc::new(InMemoryRepository::<help_request::Model>::new()),
            articles: Arc::new(InMemoryRepository::<articles::Model>::new()),
            menu_item_reviews: Arc::new(InMemoryRepository::<menu_item_review::Model>::new()),
            recommendation_requests: Arc::new(
                InMemoryRepository::<recommendation_request::Model>::new(),
            ),
            users: Arc::new(InMemoryRepository::<user::Model>::new()),
        }
    }
}
