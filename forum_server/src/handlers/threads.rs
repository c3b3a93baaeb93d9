use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use forum_core::{
    ids::ThreadRef,
    models::{
        paging::{PageQuery, PostPage},
        requests::{NewPost, NewVote, ThreadUpdate},
    },
};

use super::AppState;
use crate::error::ApiError;

pub async fn create_posts(
    State(core): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(posts): Json<Vec<NewPost>>,
) -> Result<impl IntoResponse, ApiError> {
    let thread = ThreadRef::resolve(&slug_or_id);
    let posts = core.posts.create_posts(&thread, posts).await?;
    Ok((StatusCode::CREATED, Json(posts)))
}

pub async fn thread_details(
    State(core): State<AppState>,
    Path(slug_or_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let thread = ThreadRef::resolve(&slug_or_id);
    Ok(Json(core.threads.get_thread(&thread).await?))
}

pub async fn update_thread(
    State(core): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(patch): Json<ThreadUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let thread = ThreadRef::resolve(&slug_or_id);
    Ok(Json(core.threads.update_thread(&thread, patch).await?))
}

pub async fn thread_posts(
    State(core): State<AppState>,
    Path(slug_or_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let thread = ThreadRef::resolve(&slug_or_id);
    let page = PostPage::try_from(query)?;
    Ok(Json(core.posts.get_thread_posts(&thread, page).await?))
}

pub async fn vote(
    State(core): State<AppState>,
    Path(slug_or_id): Path<String>,
    Json(vote): Json<NewVote>,
) -> Result<impl IntoResponse, ApiError> {
    let thread = ThreadRef::resolve(&slug_or_id);
    Ok(Json(core.threads.cast_vote(&thread, vote).await?))
}
