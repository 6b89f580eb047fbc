use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::repo::{TagRepository, TaskRepository, UserRepository};
use crate::services::{AuthService, TagService, TaskService};

/// Shared application state: repositories and services constructed once at
/// process start and injected into the router.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub tags: TagService,
    pub jwt: JwtKeys,
    pub pool: Arc<SqlitePool>,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtKeys) -> Self {
        let pool = Arc::new(pool);
        let users = UserRepository::new(pool.clone());
        let tags = TagRepository::new(pool.clone());
        let tasks = TaskRepository::new(pool.clone());

        Self {
            auth: AuthService::new(users, jwt.clone()),
            tasks: TaskService::new(tasks, tags.clone()),
            tags: TagService::new(tags),
            jwt,
            pool,
        }
    }
}
