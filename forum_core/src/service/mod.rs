use std::sync::Arc;

use sea_orm::{DbErr, SqlErr};
use tokio::sync::{Mutex, MutexGuard};

pub mod admin;
pub mod forums;
pub mod posts;
pub mod threads;
pub mod users;

/// Integrity constraint a failed write tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
}

pub(crate) fn violation(err: &DbErr) -> Option<Violation> {
    match err.sql_err()? {
        SqlErr::UniqueConstraintViolation(_) => Some(Violation::Unique),
        SqlErr::ForeignKeyConstraintViolation(_) => Some(Violation::ForeignKey),
        _ => None,
    }
}

/// Admits one writer at a time to the database.
///
/// SQLite has a single write lock, and a transaction that reads before it
/// writes cannot wait for it once another writer holds it. Every service
/// sharing a pool must share one gate and hold it for the whole write.
#[derive(Clone, Default)]
pub struct WriteGate(Arc<Mutex<()>>);

impl WriteGate {
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}
