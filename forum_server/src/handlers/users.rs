use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use forum_core::models::requests::{ProfileUpdate, UserProfile};

use super::AppState;
use crate::error::ApiError;

pub async fn create_user(
    State(core): State<AppState>,
    Path(nickname): Path<String>,
    Json(profile): Json<UserProfile>,
) -> Result<impl IntoResponse, ApiError> {
    let user = core.users.create_user(&nickname, profile).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_profile(
    State(core): State<AppState>,
    Path(nickname): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(core.users.get_profile(&nickname).await?))
}

pub async fn update_profile(
    State(core): State<AppState>,
    Path(nickname): Path<String>,
    Json(patch): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(core.users.update_profile(&nickname, patch).await?))
}
