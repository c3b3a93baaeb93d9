use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000001_create_users_table::Users;
use super::m20240301_000002_create_forums_table::Forums;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Threads::Table)
                    .col(pk_auto(Threads::Id))
                    .col(string_null(Threads::Slug).unique_key())
                    .col(string(Threads::Title))
                    .col(string(Threads::Author))
                    .col(string(Threads::Forum))
                    .col(text(Threads::Message))
                    .col(integer(Threads::Votes).default(0))
                    .col(string(Threads::Created))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-threads-author")
                            .from(Threads::Table, Threads::Author)
                            .to(Users::Table, Users::Nickname)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-threads-forum")
                            .from(Threads::Table, Threads::Forum)
                            .to(Forums::Table, Forums::Slug)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Forum thread listing is ordered by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_threads_forum_created")
                    .table(Threads::Table)
                    .col(Threads::Forum)
                    .col(Threads::Created)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Threads::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Threads {
    Table,
    Id,
    Slug,
    Title,
    Author,
    Forum,
    Message,
    Votes,
    Created,
}
