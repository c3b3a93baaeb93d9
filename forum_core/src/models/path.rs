use sea_orm::{
    sea_query::{ArrayType, Nullable, ValueType, ValueTypeErr},
    DbErr, QueryResult, TryGetError, TryGetable, Value,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ids::PostId;

/// Digits per encoded segment; wide enough for any positive `i64`.
const SEGMENT_WIDTH: usize = 19;
const SEPARATOR: char = '.';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("malformed path segment `{0}`")]
    Segment(String),
}

/// Materialized ancestry of a post: ids from the tree root down to the post
/// itself.
///
/// Persisted as fixed-width, zero-padded decimal segments joined by `.`, so
/// comparing two encodings byte-wise gives the same answer as comparing the
/// id sequences element-wise (`[2, 9] < [2, 10]`, `[2] < [2, 5]`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostPath(Vec<i64>);

impl PostPath {
    /// Path of a top-level post.
    pub fn root(id: PostId) -> Self {
        Self(vec![id.get()])
    }

    /// Path of a reply to the post owning `self`.
    pub fn child(&self, id: PostId) -> Self {
        let mut ids = Vec::with_capacity(self.0.len() + 1);
        ids.extend_from_slice(&self.0);
        ids.push(id.get());
        Self(ids)
    }

    pub fn ids(&self) -> &[i64] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// First element, i.e. the top-level post this post descends from.
    pub fn root_id(&self) -> Option<PostId> {
        self.0.first().copied().map(PostId::new)
    }

    /// Last element, i.e. the post the path belongs to.
    pub fn leaf_id(&self) -> Option<PostId> {
        self.0.last().copied().map(PostId::new)
    }

    pub fn is_ancestor_of(&self, other: &PostPath) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * (SEGMENT_WIDTH + 1));
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(SEPARATOR);
            }
            out.push_str(&format!("{id:0width$}", width = SEGMENT_WIDTH));
        }
        out
    }

    pub fn decode(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        raw.split(SEPARATOR)
            .map(|segment| {
                if segment.len() != SEGMENT_WIDTH {
                    return Err(PathError::Segment(segment.to_owned()));
                }
                segment
                    .parse::<i64>()
                    .map_err(|_| PathError::Segment(segment.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<i64>> for PostPath {
    fn from(ids: Vec<i64>) -> Self {
        Self(ids)
    }
}

impl fmt::Display for PostPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

// SeaORM trait implementations
impl From<PostPath> for Value {
    fn from(path: PostPath) -> Self {
        Value::String(Some(Box::new(path.encode())))
    }
}

impl TryGetable for PostPath {
    fn try_get_by<I: sea_orm::ColIdx>(res: &QueryResult, idx: I) -> Result<Self, TryGetError> {
        let raw = <String as TryGetable>::try_get_by(res, idx)?;
        PostPath::decode(&raw).map_err(|e| TryGetError::DbErr(DbErr::Type(e.to_string())))
    }
}

impl ValueType for PostPath {
    fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
        match v {
            Value::String(Some(raw)) => PostPath::decode(&raw).map_err(|_| ValueTypeErr),
            _ => Err(ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "PostPath".to_owned()
    }

    fn array_type() -> ArrayType {
        ArrayType::String
    }

    fn column_type() -> sea_orm::ColumnType {
        sea_orm::ColumnType::Text
    }
}

impl Nullable for PostPath {
    fn null() -> Value {
        Value::String(None)
    }
}
