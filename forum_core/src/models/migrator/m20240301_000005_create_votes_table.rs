use sea_orm_migration::prelude::*;

use super::m20240301_000001_create_users_table::Users;
use super::m20240301_000003_create_threads_table::Threads;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000005_create_votes_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .col(ColumnDef::new(Votes::ThreadId).integer().not_null())
                    .col(ColumnDef::new(Votes::Nickname).string().not_null())
                    .col(ColumnDef::new(Votes::Voice).integer().not_null())
                    // One vote per (thread, user); a re-vote updates this row
                    .primary_key(
                        Index::create()
                            .name("pk_votes_thread_nickname")
                            .col(Votes::ThreadId)
                            .col(Votes::Nickname),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_thread_id")
                            .from(Votes::Table, Votes::ThreadId)
                            .to(Threads::Table, Threads::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_nickname")
                            .from(Votes::Table, Votes::Nickname)
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
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Votes {
    Table,
    ThreadId,
    Nickname,
    Voice,
}
