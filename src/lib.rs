pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod response;
pub mod services;
pub mod state;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Auth routes
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        // Task routes
        .route("/tasks", get(handlers::tasks::list_tasks))
        .route("/tasks", post(handlers::tasks::create_task))
        .route("/tasks/{task_id}", get(handlers::tasks::get_task))
        .route("/tasks/{task_id}", put(handlers::tasks::update_task))
        .route("/tasks/{task_id}", delete(handlers::tasks::delete_task))
        .route(
            "/tasks/{task_id}/toggle",
            patch(handlers::tasks::toggle_task),
        )
        // Tag routes
        .route("/tags", get(handlers::tags::list_tags))
        .route("/tags", post(handlers::tags::create_tag))
        .route("/tags/{tag_id}", get(handlers::tags::get_tag))
        .route("/tags/{tag_id}", put(handlers::tags::update_tag))
        .route("/tags/{tag_id}", delete(handlers::tags::delete_tag));

    Router::new()
        .route("/", get(welcome))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn welcome() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to TODO API" }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": "Resource not found" })),
    )
}

pub mod test_utils {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use crate::auth::JwtKeys;
    use crate::state::AppState;

    pub async fn create_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    pub async fn create_test_state() -> AppState {
        let pool = create_test_pool().await;
        AppState::new(pool, JwtKeys::new(b"test-secret"))
    }
}
