// Service inputs, plus the composite outputs that are not a single entity.

use serde::{Deserialize, Serialize};

use crate::entity::prelude::{ForumModel, PostModel, ThreadModel, UserModel};

/// Treats `Some("")` the same as an absent field.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub about: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub fullname: Option<String>,
    pub about: Option<String>,
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn fullname(&self) -> Option<&str> {
        present(&self.fullname)
    }

    pub fn about(&self) -> Option<&str> {
        present(&self.about)
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }

    pub fn is_empty(&self) -> bool {
        self.fullname().is_none() && self.about().is_none() && self.email().is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewForum {
    pub slug: String,
    pub title: String,
    /// Owner nickname.
    pub user: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewThread {
    pub slug: Option<String>,
    pub title: String,
    pub author: String,
    pub message: String,
    /// RFC 3339; the server clock is used when absent.
    pub created: Option<String>,
}

impl NewThread {
    pub fn slug(&self) -> Option<&str> {
        present(&self.slug)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadUpdate {
    pub title: Option<String>,
    pub message: Option<String>,
}

impl ThreadUpdate {
    pub fn title(&self) -> Option<&str> {
        present(&self.title)
    }

    pub fn message(&self) -> Option<&str> {
        present(&self.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVote {
    pub nickname: String,
    pub voice: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPost {
    /// `0` for a top-level post.
    #[serde(default)]
    pub parent: i64,
    pub author: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdate {
    pub message: Option<String>,
}

impl PostUpdate {
    pub fn message(&self) -> Option<&str> {
        present(&self.message)
    }
}

/// A post together with whichever related entities were requested.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetails {
    pub post: PostModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forum: Option<ForumModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread: Option<ThreadModel>,
}

/// Live row counts, not the denormalized counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub user: u64,
    pub forum: u64,
    pub thread: u64,
    pub post: u64,
}
