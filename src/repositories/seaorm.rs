use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, Iterable, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder,
    Select,
};

use super::{
    ArticlesRepository, CrudRepository, HelpRequestRepository, MenuItemReviewRepository,
    RecommendationRequestRepository, Record, UserRepository,
};
use crate::database::models::{
    articles, help_request, menu_item_review, recommendation_request, user,
};

/// Repository over a single SeaORM entity table.
///
/// Repositories of all entities share one connection pool handle.
pub struct SeaOrmRepository<E> {
    db: Arc<DatabaseConnection>,
    entity: PhantomData<E>,
}

impl<E> SeaOrmRepository<E> {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            entity: PhantomData,
        }
    }
}

impl<E> Clone for SeaOrmRepository<E> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.db))
    }
}

/// Primary-key ascending order, i.e. insertion order for identity columns.
fn ordered<E: EntityTrait>(mut query: Select<E>) -> Select<E> {
    for key in E::PrimaryKey::iter() {
        query = query.order_by_asc(key.into_column());
    }
    query
}

#[async_trait]
impl<E> CrudRepository<E::Model> for SeaOrmRepository<E>
where
    E: EntityTrait,
    E::Model: Record + IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
{
    async fn find_all(&self) -> Result<Vec<E::Model>, DbErr> {
        ordered(E::find()).all(self.db.as_ref()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(self.db.as_ref()).await
    }

    async fn save(&self, record: E::Model) -> Result<E::Model, DbErr> {
        if record.id() == 0 {
            let mut active = record.into_active_model();
            // Leave the key out of the INSERT so the identity column assigns it.
            for key in E::PrimaryKey::iter() {
                active.not_set(key.into_column());
            }
            active.insert(self.db.as_ref()).await
        } else {
            record.into_active_model().reset_all().update(self.db.as_ref()).await
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), DbErr> {
        let result = E::delete_by_id(id).exec(self.db.as_ref()).await?;
        log::debug!("{} row(s) deleted for id {}", result.rows_affected, id);
        Ok(())
    }
}

#[async_trait]
impl HelpRequestRepository for SeaOrmRepository<help_request::Entity> {
    async fn find_all_by_requester_email(
        &self,
        requester_email: &str,
    ) -> Result<Vec<help_request::Model>, DbErr> {
        ordered(help_request::Entity::find())
            .filter(help_request::Column::RequesterEmail.eq(requester_email))
            .all(self.db.as_ref())
            .await
    }
}

#[async_trait]
impl ArticlesRepository for SeaOrmRepository<articles::Entity> {
    async fn find_all_by_email(&self, email: &str) -> Result<Vec<articles::Model>, DbErr> {
        ordered(articles::Entity::find())
            .filter(articles::Column::Email.eq(email))
            .all(self.db.as_ref())
            .await
    }
}

#[async_trait]
impl MenuItemReviewRepository for SeaOrmRepository<menu_item_review::Entity> {
    async fn find_all_by_item_id(
        &self,
        item_id: i64,
    ) -> Result<Vec<menu_item_review::Model>, DbErr> {
        ordered(menu_item_review::Entity::find())
            .filter(menu_item_review::Column::ItemId.eq(item_id))
            .all(self.db.as_ref())
            .await
    }
}

#[async_trait]
impl RecommendationRequestRepository for SeaOrmRepository<recommendation_request::Entity> {
    async fn find_all_by_requester_email(
        &self,
        requester_email: &str,
    ) -> Result<Vec<recommendation_request::Model>, DbErr> {
        ordered(recommendation_request::Entity::find())
            .filter(recommendation_request::Column::RequesterEmail.eq(requester_email))
            .all(self.db.as_ref())
            .await
    }
}

#[async_trait]
impl UserRepository for SeaOrmRepository<user::Entity> {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
    }
}
