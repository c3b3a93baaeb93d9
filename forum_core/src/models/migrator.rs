use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users_table;
mod m20240301_000002_create_forums_table;
mod m20240301_000003_create_threads_table;
mod m20240301_000004_create_posts_table;
mod m20240301_000005_create_votes_table;
mod m20240301_000006_create_forum_users_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users_table::Migration),
            Box::new(m20240301_000002_create_forums_table::Migration),
            Box::new(m20240301_000003_create_threads_table::Migration),
            Box::new(m20240301_000004_create_posts_table::Migration),
            Box::new(m20240301_000005_create_votes_table::Migration),
            Box::new(m20240301_000006_create_forum_users_table::Migration),
        ]
    }
}

#[cfg(test)]
use sea_orm::{Database, DbErr};

#[tokio::test]
async fn test_migrations_okay() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::refresh(&db).await?;

    assert!(schema_manager.has_table("users").await?);
    assert!(schema_manager.has_table("forums").await?);
    assert!(schema_manager.has_table("threads").await?);
    assert!(schema_manager.has_table("posts").await?);
    assert!(schema_manager.has_table("votes").await?);
    assert!(schema_manager.has_table("forum_users").await?);

    Ok(())
}
