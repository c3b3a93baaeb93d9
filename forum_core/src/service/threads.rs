use sea_orm::{ConnectionTrait, DatabaseConnection, IntoActiveModel};
use thiserror::Error;
use tracing::{debug, info};

use super::{violation, Violation, WriteGate};
use crate::{
    entity::prelude::*,
    error::ErrorKind,
    ids::ThreadRef,
    models::requests::{NewVote, ThreadUpdate},
};

/// Look a thread up by id or slug on any connection or transaction.
pub(crate) async fn find_thread<C: ConnectionTrait>(
    conn: &C,
    thread_ref: &ThreadRef,
) -> Result<Option<ThreadModel>, DbErr> {
    match thread_ref {
        ThreadRef::Id(id) => Thread::find_by_id(*id).one(conn).await,
        ThreadRef::Slug(slug) => {
            Thread::find()
                .filter(ThreadColumn::Slug.eq(slug.as_str()))
                .one(conn)
                .await
        }
    }
}

#[derive(Debug, Error)]
pub enum ThreadsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("thread not found")]
    ThreadNotFound,

    #[error("voter `{0}` not found")]
    AuthorNotFound(String),

    #[error("voice must be -1 or 1, got {0}")]
    InvalidVoice(i32),
}

impl ThreadsServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThreadsServiceError::DbError(_) => ErrorKind::StorageFailure,
            ThreadsServiceError::ThreadNotFound => ErrorKind::NotFound,
            ThreadsServiceError::AuthorNotFound(_) => ErrorKind::AuthorNotFound,
            ThreadsServiceError::InvalidVoice(_) => ErrorKind::MalformedInput,
        }
    }
}

#[derive(Clone)]
pub struct ThreadsService {
    db: DatabaseConnection,
    gate: WriteGate,
}

impl ThreadsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_gate(db, WriteGate::default())
    }

    pub fn with_gate(db: DatabaseConnection, gate: WriteGate) -> Self {
        Self { db, gate }
    }

    pub async fn get_thread(&self, thread_ref: &ThreadRef) -> Result<ThreadModel, ThreadsServiceError> {
        find_thread(&self.db, thread_ref)
            .await?
            .ok_or(ThreadsServiceError::ThreadNotFound)
    }

    /// Overwrite title and message when `patch` supplies non-empty values.
    pub async fn update_thread(
        &self,
        thread_ref: &ThreadRef,
        patch: ThreadUpdate,
    ) -> Result<ThreadModel, ThreadsServiceError> {
        let _write = self.gate.enter().await;
        let thread = self.get_thread(thread_ref).await?;

        if patch.title().is_none() && patch.message().is_none() {
            return Ok(thread);
        }

        let mut active = thread.into_active_model();
        if let Some(title) = patch.title() {
            active.title = Set(title.to_owned());
        }
        if let Some(message) = patch.message() {
            active.message = Set(message.to_owned());
        }

        Ok(active.update(&self.db).await?)
    }

    /// Record `vote.nickname`'s voice on the thread, replacing any earlier
    /// one, and return the thread with its adjusted score.
    ///
    /// Flipping an existing vote moves the score by twice the voice, a first
    /// vote by the voice, and repeating the current voice not at all.
    pub async fn cast_vote(
        &self,
        thread_ref: &ThreadRef,
        vote: NewVote,
    ) -> Result<ThreadModel, ThreadsServiceError> {
        let voice = vote.voice;
        if voice != 1 && voice != -1 {
            return Err(ThreadsServiceError::InvalidVoice(voice));
        }

        let _write = self.gate.enter().await;
        let txn = self.db.begin().await?;

        let thread = find_thread(&txn, thread_ref)
            .await?
            .ok_or(ThreadsServiceError::ThreadNotFound)?;

        let flipped = Vote::update_many()
            .col_expr(VoteColumn::Voice, Expr::value(voice))
            .filter(VoteColumn::ThreadId.eq(thread.id))
            .filter(VoteColumn::Nickname.eq(vote.nickname.as_str()))
            .filter(VoteColumn::Voice.ne(voice))
            .exec(&txn)
            .await?
            .rows_affected;

        let delta = if flipped > 0 {
            2 * voice
        } else {
            let ballot = VoteActiveModel {
                thread_id: Set(thread.id),
                nickname: Set(vote.nickname.clone()),
                voice: Set(voice),
            };
            let inserted = Vote::insert(ballot)
                .on_conflict(
                    OnConflict::columns([VoteColumn::ThreadId, VoteColumn::Nickname])
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await;

            match inserted {
                Ok(0) => 0,
                Ok(_) => voice,
                Err(err) if violation(&err) == Some(Violation::ForeignKey) => {
                    return Err(ThreadsServiceError::AuthorNotFound(vote.nickname));
                }
                Err(err) => return Err(err.into()),
            }
        };

        if delta != 0 {
            Thread::update_many()
                .col_expr(ThreadColumn::Votes, Expr::col(ThreadColumn::Votes).add(delta))
                .filter(ThreadColumn::Id.eq(thread.id))
                .exec(&txn)
                .await?;
        }

        let thread = Thread::find_by_id(thread.id)
            .one(&txn)
            .await?
            .ok_or(ThreadsServiceError::ThreadNotFound)?;

        txn.commit().await?;

        if delta != 0 {
            info!(thread = %thread.id, nickname = %vote.nickname, delta, votes = thread.votes, "vote recorded");
        } else {
            debug!(thread = %thread.id, nickname = %vote.nickname, "repeated vote ignored");
        }
        Ok(thread)
    }
}
