use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::config::ForumConfig;

pub mod migrator;
pub mod paging;
pub mod path;
pub mod requests;

pub async fn open_or_create_db(config: &ForumConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    // An in-memory database lives exactly as long as its connection
    if config.database_url.contains(":memory:") {
        options.min_connections(1);
    }

    Database::connect(options).await
}

pub async fn migrate_up(db: &DatabaseConnection) -> Result<(), DbErr> {
    migrator::Migrator::up(db, None).await
}
