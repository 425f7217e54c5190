//! Shared helpers for the shared-crate integration tests
//!
//! Every test gets its own in-memory SQLite database with migrations applied.

#![allow(dead_code)]

use sqlx::SqlitePool;
use taskdesk_shared::auth::middleware::AuthContext;
use taskdesk_shared::db::migrations::run_migrations;
use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
use taskdesk_shared::models::task::{CreateTask, Task};
use taskdesk_shared::models::user::{CreateUser, User};

/// Fresh in-memory database with the schema in place
pub async fn setup_pool() -> SqlitePool {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create in-memory pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

/// Inserts a user whose password hash is `hashed_password`
pub async fn create_user_with_hash(
    pool: &SqlitePool,
    username: &str,
    role: &str,
    hashed_password: &str,
) -> User {
    User::create(
        pool,
        CreateUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: None,
            last_name: None,
            role: role.to_string(),
            hashed_password: hashed_password.to_string(),
        },
    )
    .await
    .expect("Failed to create user")
}

/// Inserts a user with a placeholder hash (no login needed)
pub async fn create_user(pool: &SqlitePool, username: &str, role: &str) -> User {
    create_user_with_hash(pool, username, role, "not-a-real-hash").await
}

pub fn auth_context(user: &User) -> AuthContext {
    AuthContext {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role.clone(),
    }
}

pub async fn create_task(pool: &SqlitePool, owner_id: i64, title: &str) -> Task {
    Task::create(
        pool,
        owner_id,
        CreateTask {
            title: title.to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create task")
}
