//! Blog post routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::server::{ApiError, AppState};
use crate::storage::{Blog, NewBlog};

use super::numeric_id;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        .route("/:id", get(get_blog).put(update_blog).delete(delete_blog))
}

async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, ApiError> {
    Ok(Json(state.blogs.list().await?))
}

async fn get_blog(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Blog>, ApiError> {
    let id = numeric_id(&id)?;
    state.blogs.get(id).await?.map(Json).ok_or(ApiError::NotFound)
}

async fn create_blog(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Blog>), ApiError> {
    let Json(payload) = payload?;
    let new = NewBlog::from_payload(&payload)?;
    let blog = state.blogs.create(new).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Blog>, ApiError> {
    let id = numeric_id(&id)?;
    let Json(payload) = payload?;
    if state.blogs.get(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let patch = Blog::validate_patch(&payload)?;
    state.blogs.update(id, patch).await?.map(Json).ok_or(ApiError::NotFound)
}

async fn delete_blog(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Blog>, ApiError> {
    let id = numeric_id(&id)?;
    state.blogs.delete(id).await?.map(Json).ok_or(ApiError::NotFound)
}
