use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::database::models::{
    articles, help_request, menu_item_review, recommendation_request, user,
};

/// Creates every table that does not exist yet, straight from the entity definitions.
pub async fn ensure_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_if_missing(db, help_request::Entity).await?;
    create_if_missing(db, articles::Entity).await?;
    create_if_missing(db, menu_item_review::Entity).await?;
    create_if_missing(db, recommendation_request::Entity).await?;
    create_if_missing(db, user::Entity).await?;
    Ok(())
}

async fn create_if_missing<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    log::debug!("Ensured table {}", entity.table_name());
    Ok(())
}
