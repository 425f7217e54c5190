/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdesk_api::{app::AppState, config::Config};
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(pool, config);
/// let app = taskdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        auth::{jwt_auth_layer, require_admin},
        security::SecurityHeadersLayer,
    },
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use taskdesk_shared::auth::authorization::RoleHierarchy;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Role ranks for minimum-role checks
    pub fn roles(&self) -> &RoleHierarchy {
        &self.config.roles
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                         # public
/// ├── /auth                                # public
/// │   ├── POST /auth/                      # register (form)
/// │   ├── POST /auth/token                 # login (form)
/// │   └── GET  /auth/logout
/// ├── /user                                # authenticated
/// │   ├── GET  /user/
/// │   └── PUT  /user/password
/// ├── /todos                               # authenticated
/// │   ├── GET  /todos/todo-page
/// │   ├── POST /todos/todo
/// │   ├── GET  /todos/todo/:id
/// │   ├── POST /todos/todo/:id/{update,delete,quick-status,toggle-complete}
/// │   ├── GET  /todos/export
/// │   ├── POST /todos/category
/// │   └── POST /todos/category/:id/delete
/// ├── /dashboard                           # authenticated
/// │   ├── GET  /dashboard/
/// │   ├── GET  /dashboard/api/{analytics,project-categories,today-tasks,summary,all-tasks}
/// │   └── POST /dashboard/api/task/:id/toggle
/// ├── /admin                               # authenticated + admin role
/// │   ├── GET    /admin/todo
/// │   └── DELETE /admin/todo/:id
/// └── POST /chatbot/chat                   # authenticated
/// ```
///
/// Routes whose path ends in a slash also answer without it.
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Authentication, then the admin gate (per route group)
pub fn build_router(state: AppState) -> Router {
    let auth_layer = from_fn_with_state(state.clone(), jwt_auth_layer);

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/auth", post(routes::auth::register))
        .route("/auth/", post(routes::auth::register))
        .route("/auth/token", post(routes::auth::login))
        .route("/auth/logout", get(routes::auth::logout));

    let user_routes = Router::new()
        .route("/user", get(routes::users::get_profile))
        .route("/user/", get(routes::users::get_profile))
        .route("/user/password", put(routes::users::change_password))
        .route_layer(auth_layer.clone());

    let todo_routes = Router::new()
        .route("/todos/todo-page", get(routes::todos::todo_page))
        .route("/todos/todo", post(routes::todos::create_todo))
        .route("/todos/todo/:id", get(routes::todos::get_todo))
        .route("/todos/todo/:id/update", post(routes::todos::update_todo))
        .route("/todos/todo/:id/delete", post(routes::todos::delete_todo))
        .route("/todos/todo/:id/quick-status", post(routes::todos::quick_status))
        .route(
            "/todos/todo/:id/toggle-complete",
            post(routes::todos::toggle_complete),
        )
        .route("/todos/export", get(routes::todos::export_todos))
        .route("/todos/category", post(routes::todos::create_category))
        .route(
            "/todos/category/:id/delete",
            post(routes::todos::delete_category),
        )
        .route_layer(auth_layer.clone());

    let dashboard_routes = Router::new()
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route("/dashboard/", get(routes::dashboard::dashboard))
        .route("/dashboard/api/analytics", get(routes::dashboard::analytics))
        .route(
            "/dashboard/api/project-categories",
            get(routes::dashboard::project_categories),
        )
        .route("/dashboard/api/today-tasks", get(routes::dashboard::today_tasks))
        .route("/dashboard/api/summary", get(routes::dashboard::summary))
        .route("/dashboard/api/all-tasks", get(routes::dashboard::all_tasks))
        .route(
            "/dashboard/api/task/:id/toggle",
            post(routes::dashboard::toggle_task),
        )
        .route_layer(auth_layer.clone());

    // Admin gate runs after authentication (last added layer runs first)
    let admin_routes = Router::new()
        .route("/admin/todo", get(routes::admin::list_todos))
        .route("/admin/todo/:id", delete(routes::admin::delete_todo))
        .route_layer(from_fn(require_admin))
        .route_layer(auth_layer.clone());

    let chatbot_routes = Router::new()
        .route("/chatbot/chat", post(routes::chatbot::chat))
        .route_layer(auth_layer);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(todo_routes)
        .merge(dashboard_routes)
        .merge(admin_routes)
        .merge(chatbot_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}
