use std::collections::{BTreeSet, HashMap};

use sea_orm::{DatabaseConnection, IntoActiveModel};
use thiserror::Error;
use tracing::{debug, info};

use super::{threads::find_thread, violation, Violation, WriteGate};
use crate::{
    clock,
    entity::prelude::*,
    error::ErrorKind,
    ids::{PostId, ThreadId, ThreadRef},
    models::{
        paging::{PostPage, RelatedFlags, SortMode},
        path::PostPath,
        requests::{NewPost, PostDetails, PostUpdate},
    },
};

#[derive(Debug, Error)]
pub enum PostsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("thread not found")]
    ThreadNotFound,

    #[error("post not found")]
    PostNotFound,

    #[error("author `{0}` not found")]
    AuthorNotFound(String),

    /// The parent does not exist or lives in another thread.
    #[error("parent post {0} not in this thread")]
    InvalidParent(i64),
}

impl PostsServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostsServiceError::DbError(_) => ErrorKind::StorageFailure,
            PostsServiceError::ThreadNotFound => ErrorKind::NotFound,
            PostsServiceError::PostNotFound => ErrorKind::NotFound,
            PostsServiceError::AuthorNotFound(_) => ErrorKind::AuthorNotFound,
            PostsServiceError::InvalidParent(_) => ErrorKind::InvalidParent,
        }
    }
}

#[derive(Clone)]
pub struct PostsService {
    db: DatabaseConnection,
    gate: WriteGate,
}

impl PostsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_gate(db, WriteGate::default())
    }

    pub fn with_gate(db: DatabaseConnection, gate: WriteGate) -> Self {
        Self { db, gate }
    }

    /// Insert a batch of posts under one thread, all or nothing.
    ///
    /// Every post gets the same `created` timestamp and a path extending its
    /// parent's. The forum's post counter and member list are updated in the
    /// same transaction. Posts come back in input order.
    pub async fn create_posts(
        &self,
        thread_ref: &ThreadRef,
        posts: Vec<NewPost>,
    ) -> Result<Vec<PostModel>, PostsServiceError> {
        let _write = self.gate.enter().await;
        let txn = self.db.begin().await?;

        let thread = find_thread(&txn, thread_ref)
            .await?
            .ok_or(PostsServiceError::ThreadNotFound)?;

        if posts.is_empty() {
            txn.commit().await?;
            return Ok(Vec::new());
        }

        let parent_ids: BTreeSet<i64> = posts
            .iter()
            .map(|post| post.parent)
            .filter(|&parent| parent != 0)
            .collect();

        let parents: HashMap<i64, PostPath> = if parent_ids.is_empty() {
            HashMap::new()
        } else {
            Post::find()
                .filter(PostColumn::Id.is_in(parent_ids.iter().copied()))
                .filter(PostColumn::Thread.eq(thread.id))
                .all(&txn)
                .await?
                .into_iter()
                .map(|parent| (parent.id.get(), parent.path))
                .collect()
        };

        if let Some(&missing) = parent_ids.iter().find(|id| !parents.contains_key(id)) {
            return Err(PostsServiceError::InvalidParent(missing));
        }

        let created = clock::now();
        let mut inserted = Vec::with_capacity(posts.len());

        for post in posts {
            let active = PostActiveModel {
                parent: Set(post.parent),
                author: Set(post.author.clone()),
                message: Set(post.message.clone()),
                is_edited: Set(false),
                forum: Set(thread.forum.clone()),
                thread: Set(thread.id),
                created: Set(created.clone()),
                path: Set(PostPath::default()),
                root: Set(0),
                ..Default::default()
            };

            let id = match Post::insert(active).exec(&txn).await {
                Ok(res) => res.last_insert_id,
                Err(err) if violation(&err) == Some(Violation::ForeignKey) => {
                    return Err(PostsServiceError::AuthorNotFound(post.author));
                }
                Err(err) => return Err(err.into()),
            };

            let path = match parents.get(&post.parent) {
                Some(parent_path) => parent_path.child(id),
                None => PostPath::root(id),
            };
            let root = path.ids()[0];

            Post::update_many()
                .col_expr(PostColumn::Path, Expr::value(path.clone()))
                .col_expr(PostColumn::Root, Expr::value(root))
                .filter(PostColumn::Id.eq(id))
                .exec(&txn)
                .await?;

            inserted.push(PostModel {
                id,
                parent: post.parent,
                author: post.author,
                message: post.message,
                is_edited: false,
                forum: thread.forum.clone(),
                thread: thread.id,
                created: created.clone(),
                path,
                root,
            });
        }

        Forum::update_many()
            .col_expr(
                ForumColumn::Posts,
                Expr::col(ForumColumn::Posts).add(inserted.len() as i64),
            )
            .filter(ForumColumn::Slug.eq(thread.forum.as_str()))
            .exec(&txn)
            .await?;

        let authors: BTreeSet<&str> = inserted.iter().map(|post| post.author.as_str()).collect();
        let members = authors.into_iter().map(|nickname| ForumUserActiveModel {
            forum: Set(thread.forum.clone()),
            nickname: Set(nickname.to_owned()),
        });
        ForumUser::insert_many(members)
            .on_conflict(
                OnConflict::columns([ForumUserColumn::Forum, ForumUserColumn::Nickname])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;

        info!(thread = %thread.id, forum = %thread.forum, count = inserted.len(), "created posts");
        Ok(inserted)
    }

    /// One page of a thread's posts in the requested order.
    pub async fn get_thread_posts(
        &self,
        thread_ref: &ThreadRef,
        page: PostPage,
    ) -> Result<Vec<PostModel>, PostsServiceError> {
        let thread = find_thread(&self.db, thread_ref)
            .await?
            .ok_or(PostsServiceError::ThreadNotFound)?;

        let posts = match page.sort {
            SortMode::Flat => self.flat_page(thread.id, &page).await?,
            SortMode::Tree => self.tree_page(thread.id, &page).await?,
            SortMode::ParentTree => self.parent_tree_page(thread.id, &page).await?,
        };

        debug!(thread = %thread.id, sort = ?page.sort, count = posts.len(), "listed posts");
        Ok(posts)
    }

    /// Creation order. `since` is compared against post ids directly.
    async fn flat_page(
        &self,
        thread: ThreadId,
        page: &PostPage,
    ) -> Result<Vec<PostModel>, PostsServiceError> {
        let mut query = Post::find().filter(PostColumn::Thread.eq(thread));

        if let Some(since) = page.since {
            query = if page.desc {
                query.filter(PostColumn::Id.lt(since))
            } else {
                query.filter(PostColumn::Id.gt(since))
            };
        }

        let posts = query
            .order_by(PostColumn::Id, order(page.desc))
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok(posts)
    }

    /// Depth-first pre-order. `since` resolves to that post's path.
    async fn tree_page(
        &self,
        thread: ThreadId,
        page: &PostPage,
    ) -> Result<Vec<PostModel>, PostsServiceError> {
        let mut query = Post::find().filter(PostColumn::Thread.eq(thread));

        if let Some(since) = self.since_post(thread, page.since).await? {
            query = if page.desc {
                query.filter(PostColumn::Path.lt(since.path))
            } else {
                query.filter(PostColumn::Path.gt(since.path))
            };
        }

        let posts = query
            .order_by(PostColumn::Path, order(page.desc))
            .order_by(PostColumn::Id, order(page.desc))
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok(posts)
    }

    /// Like `tree_page`, but `limit` counts top-level posts and every
    /// selected top-level post comes with its whole subtree. `since`
    /// resolves to the top-level post of the referenced post's tree.
    async fn parent_tree_page(
        &self,
        thread: ThreadId,
        page: &PostPage,
    ) -> Result<Vec<PostModel>, PostsServiceError> {
        let mut roots = Post::find()
            .select_only()
            .column(PostColumn::Id)
            .filter(PostColumn::Thread.eq(thread))
            .filter(PostColumn::Parent.eq(0));

        if let Some(since) = self.since_post(thread, page.since).await? {
            roots = if page.desc {
                roots.filter(PostColumn::Id.lt(since.root))
            } else {
                roots.filter(PostColumn::Id.gt(since.root))
            };
        }

        let roots: Vec<i64> = roots
            .order_by(PostColumn::Id, order(page.desc))
            .limit(page.limit)
            .into_tuple()
            .all(&self.db)
            .await?;

        if roots.is_empty() {
            return Ok(Vec::new());
        }

        let posts = Post::find()
            .filter(PostColumn::Thread.eq(thread))
            .filter(PostColumn::Root.is_in(roots))
            .order_by(PostColumn::Path, order(page.desc))
            .order_by(PostColumn::Id, order(page.desc))
            .all(&self.db)
            .await?;

        Ok(posts)
    }

    /// The cursor post of a tree listing, which must belong to `thread`.
    async fn since_post(
        &self,
        thread: ThreadId,
        since: Option<PostId>,
    ) -> Result<Option<PostModel>, PostsServiceError> {
        let Some(since) = since else {
            return Ok(None);
        };

        let post = Post::find_by_id(since)
            .filter(PostColumn::Thread.eq(thread))
            .one(&self.db)
            .await?
            .ok_or(PostsServiceError::PostNotFound)?;

        Ok(Some(post))
    }

    pub async fn get_post(&self, id: PostId) -> Result<PostModel, PostsServiceError> {
        Post::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PostsServiceError::PostNotFound)
    }

    /// A post plus whichever of its author, forum and thread `flags` asks for.
    pub async fn get_post_details(
        &self,
        id: PostId,
        flags: RelatedFlags,
    ) -> Result<PostDetails, PostsServiceError> {
        let post = self.get_post(id).await?;

        let author = if flags.user {
            User::find_by_id(post.author.as_str()).one(&self.db).await?
        } else {
            None
        };
        let forum = if flags.forum {
            Forum::find_by_id(post.forum.as_str()).one(&self.db).await?
        } else {
            None
        };
        let thread = if flags.thread {
            Thread::find_by_id(post.thread).one(&self.db).await?
        } else {
            None
        };

        Ok(PostDetails {
            post,
            author,
            forum,
            thread,
        })
    }

    /// Replace the message. Only an actual change marks the post edited.
    pub async fn update_post(
        &self,
        id: PostId,
        patch: PostUpdate,
    ) -> Result<PostModel, PostsServiceError> {
        let _write = self.gate.enter().await;
        let post = self.get_post(id).await?;

        let message = match patch.message() {
            Some(message) if message != post.message => message.to_owned(),
            _ => return Ok(post),
        };

        let mut active = post.into_active_model();
        active.message = Set(message);
        active.is_edited = Set(true);

        Ok(active.update(&self.db).await?)
    }
}

fn order(desc: bool) -> Order {
    if desc {
        Order::Desc
    } else {
        Order::Asc
    }
}
