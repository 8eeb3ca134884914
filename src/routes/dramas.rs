//! Drama progress routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::server::{ApiError, AppState};
use crate::storage::{Drama, NewDrama};

use super::numeric_id;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_dramas).post(create_drama))
        .route("/:id", get(get_drama).put(update_drama).delete(delete_drama))
}

async fn list_dramas(State(state): State<AppState>) -> Result<Json<Vec<Drama>>, ApiError> {
    Ok(Json(state.dramas.list().await?))
}

async fn get_drama(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Drama>, ApiError> {
    let id = numeric_id(&id)?;
    state.dramas.get(id).await?.map(Json).ok_or(ApiError::NotFound)
}

async fn create_drama(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Drama>), ApiError> {
    let Json(payload) = payload?;
    let new = NewDrama::from_payload(&payload)?;
    Ok((StatusCode::CREATED, Json(state.dramas.create(new).await?)))
}

async fn update_drama(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Drama>, ApiError> {
    let id = numeric_id(&id)?;
    let Json(payload) = payload?;
    if state.dramas.get(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let patch = Drama::validate_patch(&payload)?;
    state.dramas.update(id, patch).await?.map(Json).ok_or(ApiError::NotFound)
}

async fn delete_drama(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Drama>, ApiError> {
    let id = numeric_id(&id)?;
    state.dramas.delete(id).await?.map(Json).ok_or(ApiError::NotFound)
}
