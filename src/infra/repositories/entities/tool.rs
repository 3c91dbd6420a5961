//! Tool database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Tool;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_per_day: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tool {
    fn from(model: Model) -> Self {
        Tool {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            category: model.category,
            price_per_day: model.price_per_day,
            latitude: model.latitude,
            longitude: model.longitude,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
