use std::sync::Arc;

use forum_core::ForumCore;

pub mod forums;
pub mod posts;
pub mod service;
pub mod threads;
pub mod users;

pub type AppState = Arc<ForumCore>;
