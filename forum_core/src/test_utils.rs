use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;

use crate::{clock, entity::prelude::*, models::migrator::Migrator};

/// Fresh in-memory database with every migration applied.
///
/// The pool holds a single connection: each connection to `sqlite::memory:`
/// would otherwise see its own empty database.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to create in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn seed_user(db: &DatabaseConnection, nickname: &str) -> UserModel {
    let user = UserActiveModel {
        nickname: Set(nickname.to_owned()),
        fullname: Set(format!("{nickname} Fullname")),
        about: Set(String::new()),
        email: Set(format!("{nickname}@example.org")),
    };
    User::insert(user)
        .exec_with_returning(db)
        .await
        .expect("Failed to seed user")
}

pub async fn seed_forum(db: &DatabaseConnection, slug: &str, owner: &str) -> ForumModel {
    let forum = ForumActiveModel {
        slug: Set(slug.to_owned()),
        title: Set(format!("{slug} title")),
        user: Set(owner.to_owned()),
        posts: Set(0),
        threads: Set(0),
    };
    Forum::insert(forum)
        .exec_with_returning(db)
        .await
        .expect("Failed to seed forum")
}

/// Inserts a thread row directly, without touching forum counters.
pub async fn seed_thread(
    db: &DatabaseConnection,
    forum: &str,
    author: &str,
    slug: Option<&str>,
) -> ThreadModel {
    let thread = ThreadActiveModel {
        slug: Set(slug.map(str::to_owned)),
        title: Set("Seeded thread".to_owned()),
        author: Set(author.to_owned()),
        forum: Set(forum.to_owned()),
        message: Set("seeded".to_owned()),
        votes: Set(0),
        created: Set(clock::now()),
        ..Default::default()
    };
    Thread::insert(thread)
        .exec_with_returning(db)
        .await
        .expect("Failed to seed thread")
}

/// `alice` owning forum `news` with one thread, the usual starting point.
pub async fn seed_news(db: &DatabaseConnection) -> (ForumModel, ThreadModel) {
    seed_user(db, "alice").await;
    let forum = seed_forum(db, "news", "alice").await;
    let thread = seed_thread(db, "news", "alice", None).await;
    (forum, thread)
}
