pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod ids;
pub mod models;
pub mod service;

#[cfg(test)]
mod test_utils;

use sea_orm::{DatabaseConnection, DbErr};
use tracing::info;

use crate::{
    config::ForumConfig,
    service::{
        admin::AdminService, forums::ForumsService, posts::PostsService,
        threads::ThreadsService, users::UsersService, WriteGate,
    },
};

/// Main runtime handle: the database pool plus one handle per service.
#[derive(Clone)]
pub struct ForumCore {
    pub config: ForumConfig,
    pub db: DatabaseConnection,

    pub users: UsersService,
    pub forums: ForumsService,
    pub threads: ThreadsService,
    pub posts: PostsService,
    pub admin: AdminService,
}

impl ForumCore {
    /// Connect to the configured database and bring its schema up to date.
    pub async fn start(config: ForumConfig) -> Result<Self, DbErr> {
        let db = models::open_or_create_db(&config).await?;
        models::migrate_up(&db).await?;

        info!(
            database = %config.database_url,
            max_connections = config.max_connections,
            "database ready"
        );

        Ok(Self::with_db(config, db))
    }

    /// Build the services over `db`. They share one [`WriteGate`].
    pub fn with_db(config: ForumConfig, db: DatabaseConnection) -> Self {
        let gate = WriteGate::default();
        Self {
            users: UsersService::with_gate(db.clone(), gate.clone()),
            forums: ForumsService::with_gate(db.clone(), gate.clone()),
            threads: ThreadsService::with_gate(db.clone(), gate.clone()),
            posts: PostsService::with_gate(db.clone(), gate.clone()),
            admin: AdminService::with_gate(db.clone(), gate),
            config,
            db,
        }
    }
}

pub mod prelude {
    pub use super::ids;
    pub use super::entity;
    pub use super::models;

    pub use super::service;

    pub use super::error;

    pub use super::config;

    pub use super::ForumCore;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ids::ThreadRef, models::requests::*};

    fn profile(nickname: &str) -> UserProfile {
        UserProfile {
            fullname: nickname.to_owned(),
            about: String::new(),
            email: format!("{nickname}@example.org"),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let core = ForumCore::start(ForumConfig::in_memory())
            .await
            .expect("Failed to start core");

        core.users
            .create_user(
                "alice",
                UserProfile {
                    fullname: "Alice".to_owned(),
                    about: String::new(),
                    email: "alice@example.org".to_owned(),
                },
            )
            .await
            .unwrap();
        core.forums
            .create_forum(NewForum {
                slug: "news".to_owned(),
                title: "News".to_owned(),
                user: "alice".to_owned(),
            })
            .await
            .unwrap();

        let thread = core
            .forums
            .create_thread(
                "news",
                NewThread {
                    title: "T1".to_owned(),
                    author: "alice".to_owned(),
                    message: "m".to_owned(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(thread.id.get(), 1);
        assert_eq!(thread.votes, 0);

        let thread_ref = ThreadRef::resolve("1");
        let up = NewVote {
            nickname: "alice".to_owned(),
            voice: 1,
        };
        assert_eq!(core.threads.cast_vote(&thread_ref, up).await.unwrap().votes, 1);
        let down = NewVote {
            nickname: "alice".to_owned(),
            voice: -1,
        };
        assert_eq!(core.threads.cast_vote(&thread_ref, down).await.unwrap().votes, -1);

        let root = core
            .posts
            .create_posts(
                &thread_ref,
                vec![NewPost {
                    parent: 0,
                    author: "alice".to_owned(),
                    message: "root".to_owned(),
                }],
            )
            .await
            .unwrap()
            .remove(0);
        assert_eq!(root.path.ids(), &[root.id.get()]);

        let reply = core
            .posts
            .create_posts(
                &thread_ref,
                vec![NewPost {
                    parent: root.id.get(),
                    author: "alice".to_owned(),
                    message: "reply".to_owned(),
                }],
            )
            .await
            .unwrap()
            .remove(0);
        assert_eq!(reply.path.ids(), &[root.id.get(), reply.id.get()]);

        let page = models::paging::PostPage {
            limit: 10,
            ..Default::default()
        };
        let listed = core.posts.get_thread_posts(&thread_ref, page).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|post| post.id).collect();
        assert_eq!(ids, [root.id, reply.id]);

        let status = core.admin.status().await.unwrap();
        assert_eq!(status, ServiceStatus { user: 1, forum: 1, thread: 1, post: 2 });
        assert_eq!(core.forums.get_forum("news").await.unwrap().posts, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_on_file_database() {
        let dir = std::env::temp_dir().join(format!("forum_concurrent_{}", std::process::id()));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let core = ForumCore::start(ForumConfig::new(&dir))
            .await
            .expect("Failed to start core");
        assert!(core.config.max_connections > 1);

        core.users.create_user("alice", profile("alice")).await.unwrap();
        core.forums
            .create_forum(NewForum {
                slug: "news".to_owned(),
                title: "News".to_owned(),
                user: "alice".to_owned(),
            })
            .await
            .unwrap();
        let thread = core
            .forums
            .create_thread(
                "news",
                NewThread {
                    title: "T1".to_owned(),
                    author: "alice".to_owned(),
                    message: "m".to_owned(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let thread_ref = ThreadRef::Id(thread.id);

        let mut batches = Vec::new();
        for n in 0..40 {
            let core = core.clone();
            let thread_ref = thread_ref.clone();
            batches.push(tokio::spawn(async move {
                let post = NewPost {
                    parent: 0,
                    author: "alice".to_owned(),
                    message: format!("post {n}"),
                };
                core.posts.create_posts(&thread_ref, vec![post]).await
            }));
        }
        for batch in batches {
            assert_eq!(batch.await.unwrap().unwrap().len(), 1);
        }
        assert_eq!(core.forums.get_forum("news").await.unwrap().posts, 40);

        let voters: Vec<String> = (0..40).map(|n| format!("voter{n}")).collect();
        for nickname in &voters {
            core.users.create_user(nickname, profile(nickname)).await.unwrap();
        }

        let mut ballots = Vec::new();
        for nickname in voters {
            let core = core.clone();
            let thread_ref = thread_ref.clone();
            ballots.push(tokio::spawn(async move {
                let vote = NewVote { nickname, voice: 1 };
                core.threads.cast_vote(&thread_ref, vote).await
            }));
        }
        for ballot in ballots {
            ballot.await.unwrap().unwrap();
        }
        assert_eq!(core.threads.get_thread(&thread_ref).await.unwrap().votes, 40);

        let status = core.admin.status().await.unwrap();
        assert_eq!(status, ServiceStatus { user: 41, forum: 1, thread: 1, post: 40 });

        core.db.close().await.unwrap();
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
