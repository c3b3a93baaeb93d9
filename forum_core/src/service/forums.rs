use sea_orm::DatabaseConnection;
use thiserror::Error;
use tracing::info;

use super::{threads::find_thread, violation, Violation, WriteGate};
use crate::{
    clock,
    entity::prelude::*,
    error::ErrorKind,
    ids::ThreadRef,
    models::{
        paging::Page,
        requests::{NewForum, NewThread},
    },
};

#[derive(Debug, Error)]
pub enum ForumsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("forum not found")]
    ForumNotFound,

    #[error("author `{0}` not found")]
    AuthorNotFound(String),

    #[error("forum already exists")]
    AlreadyExists(ForumModel),

    #[error("thread already exists")]
    ThreadAlreadyExists(ThreadModel),

    #[error("malformed timestamp `{0}`")]
    MalformedTimestamp(String),
}

impl ForumsServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForumsServiceError::DbError(_) => ErrorKind::StorageFailure,
            ForumsServiceError::ForumNotFound => ErrorKind::NotFound,
            ForumsServiceError::AuthorNotFound(_) => ErrorKind::AuthorNotFound,
            ForumsServiceError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            ForumsServiceError::ThreadAlreadyExists(_) => ErrorKind::AlreadyExists,
            ForumsServiceError::MalformedTimestamp(_) => ErrorKind::MalformedInput,
        }
    }
}

#[derive(Clone)]
pub struct ForumsService {
    db: DatabaseConnection,
    gate: WriteGate,
}

impl ForumsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_gate(db, WriteGate::default())
    }

    pub fn with_gate(db: DatabaseConnection, gate: WriteGate) -> Self {
        Self { db, gate }
    }

    /// Create a forum owned by an existing user, with zeroed counters.
    pub async fn create_forum(&self, forum: NewForum) -> Result<ForumModel, ForumsServiceError> {
        let active = ForumActiveModel {
            slug: Set(forum.slug.clone()),
            title: Set(forum.title),
            user: Set(forum.user.clone()),
            posts: Set(0),
            threads: Set(0),
        };

        let _write = self.gate.enter().await;
        match Forum::insert(active).exec_with_returning(&self.db).await {
            Ok(created) => {
                info!(slug = %created.slug, owner = %created.user, "created forum");
                Ok(created)
            }
            Err(err) => match violation(&err) {
                Some(Violation::ForeignKey) => Err(ForumsServiceError::AuthorNotFound(forum.user)),
                Some(Violation::Unique) => {
                    let existing = self.get_forum(&forum.slug).await?;
                    Err(ForumsServiceError::AlreadyExists(existing))
                }
                None => Err(err.into()),
            },
        }
    }

    pub async fn get_forum(&self, slug: &str) -> Result<ForumModel, ForumsServiceError> {
        Forum::find_by_id(slug)
            .one(&self.db)
            .await?
            .ok_or(ForumsServiceError::ForumNotFound)
    }

    pub async fn forum_exists(&self, slug: &str) -> Result<bool, ForumsServiceError> {
        let count = Forum::find()
            .filter(ForumColumn::Slug.eq(slug))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Open a thread in `forum_slug`. Bumps the forum's thread counter and
    /// records the author as a forum member in the same transaction.
    pub async fn create_thread(
        &self,
        forum_slug: &str,
        thread: NewThread,
    ) -> Result<ThreadModel, ForumsServiceError> {
        let slug = thread.slug().map(str::to_owned);

        if let Some(existing) = self.find_by_slug(slug.as_deref()).await? {
            return Err(ForumsServiceError::ThreadAlreadyExists(existing));
        }

        let forum = self.get_forum(forum_slug).await?;

        let created = match thread.created.as_deref().filter(|raw| !raw.is_empty()) {
            Some(raw) => clock::normalize(raw)
                .map_err(|_| ForumsServiceError::MalformedTimestamp(raw.to_owned()))?,
            None => clock::now(),
        };

        let active = ThreadActiveModel {
            slug: Set(slug.clone()),
            title: Set(thread.title),
            author: Set(thread.author.clone()),
            forum: Set(forum.slug.clone()),
            message: Set(thread.message),
            votes: Set(0),
            created: Set(created),
            ..Default::default()
        };

        let _write = self.gate.enter().await;
        let txn = self.db.begin().await?;

        let created = match Thread::insert(active).exec_with_returning(&txn).await {
            Ok(created) => created,
            Err(err) => {
                txn.rollback().await?;
                return Err(match violation(&err) {
                    Some(Violation::ForeignKey) => {
                        ForumsServiceError::AuthorNotFound(thread.author)
                    }
                    Some(Violation::Unique) => match self.find_by_slug(slug.as_deref()).await? {
                        Some(existing) => ForumsServiceError::ThreadAlreadyExists(existing),
                        None => err.into(),
                    },
                    None => err.into(),
                });
            }
        };

        Forum::update_many()
            .col_expr(ForumColumn::Threads, Expr::col(ForumColumn::Threads).add(1))
            .filter(ForumColumn::Slug.eq(&forum.slug))
            .exec(&txn)
            .await?;

        let member = ForumUserActiveModel {
            forum: Set(forum.slug.clone()),
            nickname: Set(created.author.clone()),
        };
        ForumUser::insert(member)
            .on_conflict(
                OnConflict::columns([ForumUserColumn::Forum, ForumUserColumn::Nickname])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;

        info!(id = %created.id, forum = %created.forum, "created thread");
        Ok(created)
    }

    /// Users who authored a thread or post in the forum, by nickname.
    /// `since` is an exclusive nickname bound.
    pub async fn list_forum_users(
        &self,
        slug: &str,
        page: Page,
    ) -> Result<Vec<UserModel>, ForumsServiceError> {
        let forum = self.get_forum(slug).await?;

        let mut query = User::find()
            .inner_join(ForumUser)
            .filter(ForumUserColumn::Forum.eq(forum.slug));

        if let Some(since) = page.since {
            query = if page.desc {
                query.filter(UserColumn::Nickname.lt(since))
            } else {
                query.filter(UserColumn::Nickname.gt(since))
            };
        }

        let order = if page.desc { Order::Desc } else { Order::Asc };
        let users = query
            .order_by(UserColumn::Nickname, order)
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok(users)
    }

    /// Threads of the forum by creation time. `since` is an inclusive
    /// timestamp bound.
    pub async fn list_forum_threads(
        &self,
        slug: &str,
        page: Page,
    ) -> Result<Vec<ThreadModel>, ForumsServiceError> {
        let forum = self.get_forum(slug).await?;

        let mut query = Thread::find().filter(ThreadColumn::Forum.eq(forum.slug));

        if let Some(raw) = page.since {
            let since = clock::normalize(&raw)
                .map_err(|_| ForumsServiceError::MalformedTimestamp(raw.clone()))?;
            query = if page.desc {
                query.filter(ThreadColumn::Created.lte(since))
            } else {
                query.filter(ThreadColumn::Created.gte(since))
            };
        }

        let order = if page.desc { Order::Desc } else { Order::Asc };
        let threads = query
            .order_by(ThreadColumn::Created, order.clone())
            .order_by(ThreadColumn::Id, order)
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok(threads)
    }

    async fn find_by_slug(&self, slug: Option<&str>) -> Result<Option<ThreadModel>, DbErr> {
        match slug {
            Some(slug) => find_thread(&self.db, &ThreadRef::Slug(slug.to_owned())).await,
            None => Ok(None),
        }
    }
}
