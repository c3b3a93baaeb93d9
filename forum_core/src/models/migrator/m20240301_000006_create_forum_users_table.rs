use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_users_table::Users;
use super::m20240301_000002_create_forums_table::Forums;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000006_create_forum_users_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ForumUsers::Table)
                    .col(ColumnDef::new(ForumUsers::Forum).string().not_null())
                    .col(ColumnDef::new(ForumUsers::Nickname).string().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_forum_users_forum_nickname")
                            .col(ForumUsers::Forum)
                            .col(ForumUsers::Nickname),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_users_forum")
                            .from(ForumUsers::Table, ForumUsers::Forum)
                            .to(Forums::Table, Forums::Slug)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_users_nickname")
                            .from(ForumUsers::Table, ForumUsers::Nickname)
                            .to(Users::Table, Users::Nickname)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Member listing is ordered by nickname
        manager
            .create_index(
                Index::create()
                    .name("idx_forum_users_nickname")
                    .table(ForumUsers::Table)
                    .col(ForumUsers::Nickname)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForumUsers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ForumUsers {
    Table,
    Forum,
    Nickname,
}
