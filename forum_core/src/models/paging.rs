use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::{error::ErrorKind, ids::PostId};

pub const DEFAULT_LIMIT: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("invalid limit `{0}`")]
    Limit(String),
    #[error("invalid since cursor `{0}`")]
    Since(String),
    #[error("invalid desc flag `{0}`")]
    Desc(String),
    #[error("unknown sort mode `{0}`")]
    Sort(String),
}

impl PageError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedInput
    }
}

/// How a thread's posts are ordered and paginated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Creation order, by id.
    #[default]
    Flat,
    /// Depth-first pre-order, by materialized path.
    Tree,
    /// Depth-first pre-order, `limit` counts top-level posts.
    ParentTree,
}

impl FromStr for SortMode {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(SortMode::Flat),
            "tree" => Ok(SortMode::Tree),
            "parent_tree" => Ok(SortMode::ParentTree),
            other => Err(PageError::Sort(other.to_owned())),
        }
    }
}

/// Raw query-string parameters shared by every listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub since: Option<String>,
    pub desc: Option<String>,
    pub sort: Option<String>,
}

impl PageQuery {
    fn limit(&self) -> Result<u64, PageError> {
        match self.limit.as_deref() {
            None | Some("") => Ok(DEFAULT_LIMIT),
            Some(raw) => raw.parse().map_err(|_| PageError::Limit(raw.to_owned())),
        }
    }

    fn desc(&self) -> Result<bool, PageError> {
        match self.desc.as_deref() {
            None | Some("") | Some("false") => Ok(false),
            Some("true") => Ok(true),
            Some(raw) => Err(PageError::Desc(raw.to_owned())),
        }
    }

    fn since(&self) -> Option<&str> {
        self.since.as_deref().filter(|s| !s.is_empty())
    }
}

/// Keyset page over a forum's users or threads. `since` is a nickname or a
/// timestamp depending on the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub since: Option<String>,
    pub desc: bool,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            since: None,
            desc: false,
        }
    }
}

impl TryFrom<PageQuery> for Page {
    type Error = PageError;

    fn try_from(query: PageQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            limit: query.limit()?,
            since: query.since().map(str::to_owned),
            desc: query.desc()?,
        })
    }
}

/// Keyset page over a thread's posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub limit: u64,
    pub since: Option<PostId>,
    pub desc: bool,
    pub sort: SortMode,
}

impl Default for PostPage {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            since: None,
            desc: false,
            sort: SortMode::Flat,
        }
    }
}

impl TryFrom<PageQuery> for PostPage {
    type Error = PageError;

    fn try_from(query: PageQuery) -> Result<Self, Self::Error> {
        let since = query
            .since()
            .map(|raw| raw.parse().map_err(|_| PageError::Since(raw.to_owned())))
            .transpose()?;
        let sort = match query.sort.as_deref() {
            None | Some("") => SortMode::default(),
            Some(raw) => raw.parse()?,
        };
        Ok(Self {
            limit: query.limit()?,
            since,
            desc: query.desc()?,
            sort,
        })
    }
}

/// Which related entities accompany a post lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelatedFlags {
    pub user: bool,
    pub forum: bool,
    pub thread: bool,
}

impl RelatedFlags {
    /// Parses a comma-separated list such as `user,thread`. Unknown names
    /// are ignored.
    pub fn parse(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .fold(Self::default(), |mut flags, name| {
                match name {
                    "user" => flags.user = true,
                    "forum" => flags.forum = true,
                    "thread" => flags.thread = true,
                    _ => {}
                }
                flags
            })
    }
}
