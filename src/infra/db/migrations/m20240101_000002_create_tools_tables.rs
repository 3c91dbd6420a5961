//! Migration: Create tools and tool_images tables.

use sea_orm_migration::prelude::*;

use super::{Tools, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tools::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tools::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tools::UserId).integer().not_null())
                    .col(ColumnDef::new(Tools::Name).string().not_null())
                    .col(ColumnDef::new(Tools::Description).text().null())
                    .col(ColumnDef::new(Tools::Category).string().null())
                    .col(ColumnDef::new(Tools::PricePerDay).double().not_null())
                    .col(ColumnDef::new(Tools::Latitude).double().not_null())
                    .col(ColumnDef::new(Tools::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(Tools::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tools::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tools_user_id")
                            .from(Tools::Table, Tools::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tools_user_id")
                    .table(Tools::Table)
                    .col(Tools::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ToolImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ToolImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ToolImages::ToolId).integer().not_null())
                    .col(ColumnDef::new(ToolImages::ImageUrl).string().not_null())
                    .col(
                        ColumnDef::new(ToolImages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ToolImages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tool_images_tool_id")
                            .from(ToolImages::Table, ToolImages::ToolId)
                            .to(Tools::Table, Tools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tool_images_tool_id")
                    .table(ToolImages::Table)
                    .col(ToolImages::ToolId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ToolImages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tools::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ToolImages {
    Table,
    Id,
    ToolId,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}
