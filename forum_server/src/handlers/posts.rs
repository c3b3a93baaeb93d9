use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use forum_core::{
    ids::PostId,
    models::{paging::RelatedFlags, requests::PostUpdate},
};

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct DetailsQuery {
    /// Comma-separated subset of `user,forum,thread`.
    related: Option<String>,
}

fn post_id(raw: &str) -> Result<PostId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::malformed(format!("invalid post id `{raw}`")))
}

pub async fn post_details(
    State(core): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let flags = RelatedFlags::parse(query.related.as_deref().unwrap_or_default());
    Ok(Json(core.posts.get_post_details(post_id(&id)?, flags).await?))
}

pub async fn update_post(
    State(core): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PostUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(core.posts.update_post(post_id(&id)?, patch).await?))
}
