//! Common test utilities for API integration tests
//!
//! Each `TestContext` owns a fresh in-memory SQLite database with migrations
//! applied, the real router, and three seeded users (user, manager, admin)
//! with ready-made access tokens.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashMap;
use taskdesk_api::app::{build_router, AppState};
use taskdesk_api::config::Config;
use taskdesk_shared::auth::jwt::create_access_token;
use taskdesk_shared::auth::password::hash_password;
use taskdesk_shared::db::migrations::run_migrations;
use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
use taskdesk_shared::models::task::{CreateTask, Task};
use taskdesk_shared::models::user::{CreateUser, User};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Password of every seeded user
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: Router,
    pub config: Config,
    pub user: User,
    pub manager: User,
    pub admin: User,
    pub user_token: String,
    pub manager_token: String,
    pub admin_token: String,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let vars = HashMap::from([("JWT_SECRET", TEST_SECRET)]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))?;

        let db = create_pool(DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let hashed = hash_password(TEST_PASSWORD)?;
        let user = seed_user(&db, "alice", "user", &hashed).await?;
        let manager = seed_user(&db, "morgan", "manager", &hashed).await?;
        let admin = seed_user(&db, "root", "admin", &hashed).await?;

        let user_token = token_for(&config, &user)?;
        let manager_token = token_for(&config, &manager)?;
        let admin_token = token_for(&config, &admin)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            manager,
            admin,
            user_token,
            manager_token,
            admin_token,
        })
    }

    /// Authorization header value for the plain user
    pub fn auth_header(&self) -> String {
        bearer(&self.user_token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends a request and decodes the JSON body (Null when empty)
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send_json(request(Method::GET, uri, Some(token), Body::empty()))
            .await
    }

    pub async fn post_form(&self, uri: &str, token: &str, form: &str) -> (StatusCode, Value) {
        self.send_json(form_request(Method::POST, uri, Some(token), form))
            .await
    }

    /// Creates a task directly in the database
    pub async fn create_task(&self, owner: &User, title: &str) -> Task {
        Task::create(
            &self.db,
            owner.id,
            CreateTask {
                title: title.to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create task")
    }
}

async fn seed_user(
    db: &SqlitePool,
    username: &str,
    role: &str,
    hashed_password: &str,
) -> anyhow::Result<User> {
    Ok(User::create(
        db,
        CreateUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: None,
            last_name: None,
            role: role.to_string(),
            hashed_password: hashed_password.to_string(),
        },
    )
    .await?)
}

fn token_for(config: &Config, user: &User) -> anyhow::Result<String> {
    Ok(create_access_token(
        &user.username,
        user.id,
        &user.role,
        config.jwt.access_token_ttl(),
        &config.jwt.secret,
    )?)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    builder.body(body).unwrap()
}

pub fn form_request(method: Method, uri: &str, token: Option<&str>, form: &str) -> Request<Body> {
    let mut request = request(method, uri, token, Body::from(form.to_string()));
    request.headers_mut().insert(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded".parse().unwrap(),
    );
    request
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, json: Value) -> Request<Body> {
    let mut request = request(method, uri, token, Body::from(json.to_string()));
    request
        .headers_mut()
        .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
    request
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
