use sea_orm::DatabaseConnection;
use thiserror::Error;
use tracing::warn;

use super::WriteGate;
use crate::{entity::prelude::*, error::ErrorKind, models::requests::ServiceStatus};

#[derive(Debug, Error)]
pub enum AdminServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),
}

impl AdminServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminServiceError::DbError(_) => ErrorKind::StorageFailure,
        }
    }
}

#[derive(Clone)]
pub struct AdminService {
    db: DatabaseConnection,
    gate: WriteGate,
}

impl AdminService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_gate(db, WriteGate::default())
    }

    pub fn with_gate(db: DatabaseConnection, gate: WriteGate) -> Self {
        Self { db, gate }
    }

    /// Row counts of the four content tables.
    pub async fn status(&self) -> Result<ServiceStatus, AdminServiceError> {
        Ok(ServiceStatus {
            user: User::find().count(&self.db).await?,
            forum: Forum::find().count(&self.db).await?,
            thread: Thread::find().count(&self.db).await?,
            post: Post::find().count(&self.db).await?,
        })
    }

    /// Delete every row of every table. Irreversible.
    pub async fn clear(&self) -> Result<(), AdminServiceError> {
        let _write = self.gate.enter().await;
        let txn = self.db.begin().await?;

        // Children before parents
        Vote::delete_many().exec(&txn).await?;
        ForumUser::delete_many().exec(&txn).await?;
        Post::delete_many().exec(&txn).await?;
        Thread::delete_many().exec(&txn).await?;
        Forum::delete_many().exec(&txn).await?;
        User::delete_many().exec(&txn).await?;

        txn.commit().await?;

        warn!("cleared all forum data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ids::ThreadRef,
        models::requests::{NewPost, NewVote},
        service::{posts::PostsService, threads::ThreadsService},
        test_utils::{seed_news, setup_test_db},
    };

    #[tokio::test]
    async fn test_status_counts_live_rows() {
        let db = setup_test_db().await;
        let service = AdminService::new(db.clone());

        let empty = service.status().await.unwrap();
        assert_eq!(empty, ServiceStatus { user: 0, forum: 0, thread: 0, post: 0 });

        let (_, thread) = seed_news(&db).await;
        let posts = vec![
            NewPost {
                parent: 0,
                author: "alice".to_owned(),
                message: "first".to_owned(),
            };
            2
        ];
        PostsService::new(db.clone())
            .create_posts(&ThreadRef::Id(thread.id), posts)
            .await
            .unwrap();

        let status = service.status().await.unwrap();
        assert_eq!(status, ServiceStatus { user: 1, forum: 1, thread: 1, post: 2 });
    }

    #[tokio::test]
    async fn test_clear_empties_everything() {
        let db = setup_test_db().await;
        let service = AdminService::new(db.clone());
        let (_, thread) = seed_news(&db).await;
        ThreadsService::new(db.clone())
            .cast_vote(
                &ThreadRef::Id(thread.id),
                NewVote {
                    nickname: "alice".to_owned(),
                    voice: 1,
                },
            )
            .await
            .unwrap();

        service.clear().await.unwrap();

        let status = service.status().await.unwrap();
        assert_eq!(status, ServiceStatus { user: 0, forum: 0, thread: 0, post: 0 });
        assert_eq!(Vote::find().count(&db).await.unwrap(), 0);
    }
}
