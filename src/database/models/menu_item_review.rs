use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repositories::Record;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "menuitemreview")]
#[serde(rename_all = "camelCase")]
#[schema(as = MenuItemReview)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of a dining-commons menu item; not a foreign key.
    pub item_id: i64,
    pub reviewer_email: String,
    pub stars: i32,
    #[schema(value_type = String, format = DateTime)]
    pub date_reviewed: DateTime,
    pub comments: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}
