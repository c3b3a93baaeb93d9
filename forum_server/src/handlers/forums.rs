use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use forum_core::models::{
    paging::{Page, PageQuery},
    requests::{NewForum, NewThread},
};

use super::AppState;
use crate::error::ApiError;

pub async fn create_forum(
    State(core): State<AppState>,
    Json(forum): Json<NewForum>,
) -> Result<impl IntoResponse, ApiError> {
    let forum = core.forums.create_forum(forum).await?;
    Ok((StatusCode::CREATED, Json(forum)))
}

pub async fn forum_details(
    State(core): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(core.forums.get_forum(&slug).await?))
}

pub async fn create_thread(
    State(core): State<AppState>,
    Path(slug): Path<String>,
    Json(thread): Json<NewThread>,
) -> Result<impl IntoResponse, ApiError> {
    let thread = core.forums.create_thread(&slug, thread).await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

pub async fn forum_users(
    State(core): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page::try_from(query)?;
    Ok(Json(core.forums.list_forum_users(&slug, page).await?))
}

pub async fn forum_threads(
    State(core): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page::try_from(query)?;
    Ok(Json(core.forums.list_forum_threads(&slug, page).await?))
}
