//! Favorite database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Favorite;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "favorites")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub tool_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Favorite {
    fn from(model: Model) -> Self {
        Favorite {
            id: model.id,
            user_id: model.user_id,
            tool_id: model.tool_id,
        }
    }
}
