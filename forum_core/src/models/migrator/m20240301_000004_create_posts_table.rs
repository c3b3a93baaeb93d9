use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000001_create_users_table::Users;
use super::m20240301_000002_create_forums_table::Forums;
use super::m20240301_000003_create_threads_table::Threads;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .col(pk_auto(Posts::Id))
                    .col(big_integer(Posts::Parent).default(0))
                    .col(string(Posts::Author))
                    .col(text(Posts::Message))
                    .col(boolean(Posts::IsEdited).default(false))
                    .col(string(Posts::Forum))
                    .col(integer(Posts::Thread))
                    .col(string(Posts::Created))
                    .col(text(Posts::Path))
                    .col(big_integer(Posts::Root))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-posts-author")
                            .from(Posts::Table, Posts::Author)
                            .to(Users::Table, Users::Nickname)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-posts-forum")
                            .from(Posts::Table, Posts::Forum)
                            .to(Forums::Table, Forums::Slug)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-posts-thread")
                            .from(Posts::Table, Posts::Thread)
                            .to(Threads::Table, Threads::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Flat listing: thread, then id
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_thread_id")
                    .table(Posts::Table)
                    .col(Posts::Thread)
                    .col(Posts::Id)
                    .to_owned(),
            )
            .await?;

        // Tree listing: thread, then path
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_thread_path")
                    .table(Posts::Table)
                    .col(Posts::Thread)
                    .col(Posts::Path)
                    .to_owned(),
            )
            .await?;

        // Parent-tree listing selects top-level posts, then whole subtrees
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_thread_parent_id")
                    .table(Posts::Table)
                    .col(Posts::Thread)
                    .col(Posts::Parent)
                    .col(Posts::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_posts_root_path")
                    .table(Posts::Table)
                    .col(Posts::Root)
                    .col(Posts::Path)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Posts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Posts {
    Table,
    Id,
    Parent,
    Author,
    Message,
    IsEdited,
    Forum,
    Thread,
    Created,
    Path,
    Root,
}
