use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Forums::Table)
                    .col(string(Forums::Slug).primary_key())
                    .col(string(Forums::Title))
                    .col(string(Forums::Username))
                    .col(big_integer(Forums::Posts).default(0))
                    .col(big_integer(Forums::Threads).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-forums-username")
                            .from(Forums::Table, Forums::Username)
                            .to(Users::Table, Users::Nickname)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Forums::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Forums {
    Table,
    Slug,
    Title,
    Username,
    Posts,
    Threads,
}
