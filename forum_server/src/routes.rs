use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{forums, posts, service, threads, users, AppState};

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/user/{nickname}/create", post(users::create_user))
        .route(
            "/user/{nickname}/profile",
            get(users::get_profile).post(users::update_profile),
        )
        .route("/forum/create", post(forums::create_forum))
        .route("/forum/{slug}/details", get(forums::forum_details))
        .route("/forum/{slug}/create", post(forums::create_thread))
        .route("/forum/{slug}/users", get(forums::forum_users))
        .route("/forum/{slug}/threads", get(forums::forum_threads))
        .route("/thread/{slug_or_id}/create", post(threads::create_posts))
        .route(
            "/thread/{slug_or_id}/details",
            get(threads::thread_details).post(threads::update_thread),
        )
        .route("/thread/{slug_or_id}/posts", get(threads::thread_posts))
        .route("/thread/{slug_or_id}/vote", post(threads::vote))
        .route(
            "/post/{id}/details",
            get(posts::post_details).post(posts::update_post),
        )
        .route("/service/status", get(service::status))
        .route("/service/clear", post(service::clear))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use forum_core::{config::ForumConfig, ForumCore};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn setup_test_router() -> Router {
        let core = ForumCore::start(ForumConfig::in_memory())
            .await
            .expect("Failed to start core");
        router(Arc::new(core))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(body) => Body::from(body.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn seed(app: &Router) {
        let (status, _) = call(
            app,
            "POST",
            "/api/user/alice/create",
            Some(json!({"fullname": "Alice", "about": "", "email": "alice@example.org"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(
            app,
            "POST",
            "/api/forum/create",
            Some(json!({"slug": "news", "title": "News", "user": "alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_user_conflict_returns_existing_profiles() {
        let app = setup_test_router().await;
        seed(&app).await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/user/alice/create",
            Some(json!({"fullname": "Other", "about": "", "email": "other@example.org"})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body[0]["nickname"], "alice");
    }

    #[tokio::test]
    async fn test_forum_with_unknown_owner_is_not_found() {
        let app = setup_test_router().await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/forum/create",
            Some(json!({"slug": "news", "title": "News", "user": "ghost"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_thread_vote_and_posts_flow() {
        let app = setup_test_router().await;
        seed(&app).await;

        let (status, thread) = call(
            &app,
            "POST",
            "/api/forum/news/create",
            Some(json!({"title": "T1", "author": "alice", "message": "m", "slug": "t1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(thread["id"], 1);

        let (_, voted) = call(
            &app,
            "POST",
            "/api/thread/t1/vote",
            Some(json!({"nickname": "alice", "voice": 1})),
        )
        .await;
        assert_eq!(voted["votes"], 1);
        let (_, voted) = call(
            &app,
            "POST",
            "/api/thread/1/vote",
            Some(json!({"nickname": "alice", "voice": -1})),
        )
        .await;
        assert_eq!(voted["votes"], -1);

        let (status, posts) = call(
            &app,
            "POST",
            "/api/thread/1/create",
            Some(json!([{"parent": 0, "author": "alice", "message": "root"}])),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let root_id = posts[0]["id"].as_i64().unwrap();
        assert_eq!(posts[0]["path"], json!([root_id]));
        assert_eq!(posts[0]["isEdited"], false);

        let (status, _) = call(
            &app,
            "POST",
            "/api/thread/1/create",
            Some(json!([{"parent": 9999, "author": "alice", "message": "orphan"}])),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, listed) = call(&app, "GET", "/api/thread/t1/posts?sort=tree&limit=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, _) = call(&app, "GET", "/api/thread/t1/posts?sort=sideways", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, details) = call(
            &app,
            "GET",
            &format!("/api/post/{root_id}/details?related=user,thread"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(details["author"]["nickname"], "alice");
        assert_eq!(details["thread"]["slug"], "t1");
        assert!(details.get("forum").is_none());

        let (_, status_body) = call(&app, "GET", "/api/service/status", None).await;
        assert_eq!(status_body, json!({"user": 1, "forum": 1, "thread": 1, "post": 1}));

        let (status, _) = call(&app, "POST", "/api/service/clear", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, status_body) = call(&app, "GET", "/api/service/status", None).await;
        assert_eq!(status_body, json!({"user": 0, "forum": 0, "thread": 0, "post": 0}));
    }

    #[tokio::test]
    async fn test_missing_thread_is_not_found() {
        let app = setup_test_router().await;

        let (status, _) = call(&app, "GET", "/api/thread/404/details", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, "GET", "/api/post/abc/details", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
