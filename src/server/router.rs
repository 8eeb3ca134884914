//! Router setup.
//!
//! Builds the application router with all resource routes and middleware.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, middleware};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::feed::FeedService;
use crate::routes;
use crate::storage::{BlogRepository, DramaRepository, GameRepository};

use super::auth;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Blog repository.
    pub blogs: Arc<BlogRepository>,

    /// Game ranking repository.
    pub games: Arc<GameRepository>,

    /// Drama progress repository.
    pub dramas: Arc<DramaRepository>,

    /// Cached social feed.
    pub feed: Arc<FeedService>,

    /// Shared secret for writes, if any.
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: &Config, feed: Arc<FeedService>) -> Self {
        Self {
            blogs: Arc::new(BlogRepository::new(&config.data_dir)),
            games: Arc::new(GameRepository::new(&config.data_dir)),
            dramas: Arc::new(DramaRepository::new(&config.data_dir)),
            feed,
            api_key: config.api_key.as_deref().map(Arc::from),
        }
    }
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/blogs", routes::blogs::router())
        .nest("/api/games", routes::games::router())
        .nest("/api/dramas", routes::dramas::router())
        .nest("/api/tweets", routes::tweets::router())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::cache::{CacheConfig, SystemClock};
    use crate::feed::{FakeProvider, FeedCache, FeedSettings};
    use crate::server::auth::API_KEY_HEADER;

    struct TestApp {
        router: Router,
        provider: Arc<FakeProvider>,
        _temp_dir: TempDir,
    }

    fn test_app(api_key: Option<&str>) -> TestApp {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let mut vars = HashMap::new();
        vars.insert("DATA_DIR", temp_dir.path().to_string_lossy().into_owned());
        if let Some(key) = api_key {
            vars.insert("API_KEY", key.to_string());
        }
        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let provider = Arc::new(FakeProvider::with_posts(&["hello", "world"]));
        let settings = FeedSettings {
            bearer_token: Some("token".to_string()),
            username: Some("someone".to_string()),
        };
        let cache = FeedCache::new("tweets", CacheConfig::default(), Arc::new(SystemClock));
        let feed = Arc::new(FeedService::new(settings, provider.clone(), cache));

        TestApp {
            router: build_router(AppState::new(&config, feed)),
            provider,
            _temp_dir: temp_dir,
        }
    }

    async fn send(
        app: &TestApp,
        method: Method,
        uri: &str,
        body: Option<Value>,
        api_key: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_blog_routes() {
        let app = test_app(None);

        let (status, body) = send(&app, Method::GET, "/api/blogs", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send(&app, Method::POST, "/api/blogs", Some(json!({ "title": "t" })), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "title, date, content are required");

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/blogs",
            Some(json!({ "title": "t", "date": "2024-07-01", "content": "c" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let uri = format!("/api/blogs/{id}");
        let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({ "content": "edited" })), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["content"], "edited");
        assert_eq!(updated["title"], "t");

        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "other": 1 })), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "At least one field (title, date, content) is required");

        let (status, fetched) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, updated);

        let (status, deleted) = send(&app, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["id"], id);

        let (status, body) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");

        let (status, _) = send(&app, Method::GET, "/api/blogs/not-a-number", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_game_routes() {
        let app = test_app(None);
        let game = json!({ "id": "apex", "name": "Apex Legends", "rank": "Gold", "point": 30, "history": [] });

        let (status, _) = send(&app, Method::POST, "/api/games", Some(game.clone()), None).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::POST, "/api/games", Some(game), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "id must be unique");

        let (status, updated) = send(&app, Method::PUT, "/api/games/apex", Some(json!({ "rank": "Platinum" })), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["rank"], "Platinum");
        assert_eq!(updated["point"], 30);

        let replacement = json!([
            { "id": "a", "name": "A", "rank": "1", "point": 1, "history": [] },
            { "id": "b", "name": "B", "rank": "2", "point": 2.5, "history": ["x"] }
        ]);
        let (status, body) = send(&app, Method::POST, "/api/games/set-all", Some(replacement), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Games data replaced", "count": 2 }));

        let (_, all) = send(&app, Method::GET, "/api/games", None, None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (status, body) = send(&app, Method::POST, "/api/games/set-all", Some(json!({})), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Array of games is required");

        let (status, _) = send(&app, Method::DELETE, "/api/games/apex", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, deleted) = send(&app, Method::DELETE, "/api/games/b", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["point"], 2.5);
    }

    #[tokio::test]
    async fn test_drama_routes() {
        let app = test_app(None);

        let (status, body) = send(&app, Method::POST, "/api/dramas", Some(json!({ "title": "Show", "progress": "1", "total": 10 })), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "title, progress (number), total (number) are required");

        let (status, created) = send(&app, Method::POST, "/api/dramas", Some(json!({ "title": "Show", "progress": 1, "total": 10 })), None).await;
        assert_eq!(status, StatusCode::CREATED);

        let uri = format!("/api/dramas/{}", created["id"]);
        let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({ "progress": 5 })), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["progress"], 5);

        let (_, list) = send(&app, Method::GET, "/api/dramas", None, None).await;
        assert_eq!(list, json!([updated]));
    }

    #[tokio::test]
    async fn test_update_unknown_record_is_not_found_before_validation() {
        let app = test_app(None);

        for uri in ["/api/blogs/999", "/api/dramas/999", "/api/games/missing"] {
            let (status, body) = send(&app, Method::PUT, uri, Some(json!({})), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"], "Not found");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = test_app(None);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/blogs")
            .header("content-type", "application/json")
            .body(Body::from("{ nope"))
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_tweets_route_is_cached() {
        let app = test_app(None);

        let (status, body) = send(&app, Method::GET, "/api/tweets", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["text"], "hello");
        assert_eq!(body[0]["author"]["handle"], "someone");
        assert_eq!(body[1]["author"], body[0]["author"]);

        let (status, again) = send(&app, Method::GET, "/api/tweets", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again, body);
        assert_eq!(app.provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_tweets_unknown_account() {
        let app = test_app(None);
        *app.provider.user_id.lock() = Ok(None);

        let (status, body) = send(&app, Method::GET, "/api/tweets", None, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn test_api_key_guards_writes_only() {
        let app = test_app(Some("secret"));
        let blog = json!({ "title": "t", "date": "d", "content": "c" });

        let (status, body) = send(&app, Method::POST, "/api/blogs", Some(blog.clone()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");

        let (status, _) = send(&app, Method::POST, "/api/blogs", Some(blog.clone()), Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::POST, "/api/blogs", Some(blog), Some("secret")).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(&app, Method::GET, "/api/blogs", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = test_app(None);

        let (status, body) = send(&app, Method::GET, "/api/unknown", None, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not Found" }));
    }
}
