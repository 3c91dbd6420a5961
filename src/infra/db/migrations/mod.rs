//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_tools_tables;
mod m20240101_000003_create_reviews_table;
mod m20240101_000004_create_favorites_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_tools_tables::Migration),
            Box::new(m20240101_000003_create_reviews_table::Migration),
            Box::new(m20240101_000004_create_favorites_table::Migration),
        ]
    }
}

/// Table identifiers shared by migrations that reference other tables.
#[derive(Iden)]
pub(super) enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    ProfileImage,
    Role,
    PhoneNumber,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(super) enum Tools {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Category,
    PricePerDay,
    Latitude,
    Longitude,
    CreatedAt,
    UpdatedAt,
}
