//! Latest posts of the configured account, cached for the freshness window.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::feed::FeedItem;
use crate::server::{ApiError, AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(latest_tweets))
}

async fn latest_tweets(State(state): State<AppState>) -> Result<Json<Vec<FeedItem>>, ApiError> {
    Ok(Json(state.feed.get_feed().await?))
}
