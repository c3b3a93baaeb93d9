use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use super::AppState;
use crate::error::ApiError;

pub async fn status(State(core): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(core.admin.status().await?))
}

pub async fn clear(State(core): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    core.admin.clear().await?;
    Ok(Json(json!({ "message": "cleared" })))
}
