//! Game ranking routes.
//!
//! Game ids are client-chosen strings, compared as-is.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::server::{ApiError, AppState};
use crate::storage::Game;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_games).post(create_game))
        .route("/set-all", post(replace_games))
        .route("/:id", get(get_game).put(update_game).delete(delete_game))
}

async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, ApiError> {
    Ok(Json(state.games.list().await?))
}

async fn get_game(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Game>, ApiError> {
    state.games.get(&id).await?.map(Json).ok_or(ApiError::NotFound)
}

async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    let Json(payload) = payload?;
    let game = Game::from_payload(&payload)?;
    Ok((StatusCode::CREATED, Json(state.games.create(game).await?)))
}

async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Game>, ApiError> {
    let Json(payload) = payload?;
    if state.games.get(&id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let patch = Game::patch_from_payload(&payload)?;
    state.games.update(&id, &patch).await?.map(Json).ok_or(ApiError::NotFound)
}

async fn delete_game(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Game>, ApiError> {
    state.games.delete(&id).await?.map(Json).ok_or(ApiError::NotFound)
}

/// Replace all games at once, e.g. from a spreadsheet export.
async fn replace_games(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let games = Game::list_from_payload(&payload)?;
    let count = state.games.replace_all(&games).await?;
    Ok(Json(json!({ "message": "Games data replaced", "count": count })))
}
