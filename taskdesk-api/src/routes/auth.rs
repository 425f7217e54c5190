/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login (token issue)
/// - Logout
///
/// # Endpoints
///
/// - `POST /auth/` - Register new user (form)
/// - `POST /auth/token` - Login and get an access token (form)
/// - `GET /auth/logout` - Clear the access token cookie
///
/// The token is returned in the body and also set as an HttpOnly
/// `access_token` cookie so browser clients are authenticated on follow-up
/// requests without handling the token themselves.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::empty_string_as_none,
};
use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use taskdesk_shared::{
    auth::{
        authorization::DEFAULT_ROLE, credentials::authenticate_user, jwt,
        middleware::ACCESS_TOKEN_COOKIE, password::hash_password_blocking,
    },
    models::user::{CreateUser, User},
};
use tracing::{info, warn};
use validator::Validate;

/// Register form
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Login name
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub last_name: Option<String>,

    /// Defaults to "user"
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub role: Option<String>,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl RegisterForm {
    fn validated(mut self) -> ApiResult<Self> {
        self.email = self.email.trim().to_string();
        self.username = self.username.trim().to_string();
        self.validate()?;
        Ok(self)
    }
}

/// Login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/
/// Content-Type: application/x-www-form-urlencoded
///
/// email=jane@example.com&username=jane&password=SecureP@ss123&first_name=Jane
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email or username already exists
pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Form(form) = form?;
    let form = form.validated()?;

    let role = form
        .role
        .map(|r| r.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_ROLE.to_string());

    let hashed_password = hash_password_blocking(form.password).await?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: form.email,
            username: form.username,
            first_name: form.first_name,
            last_name: form.last_name,
            role,
            hashed_password,
        },
    )
    .await?;

    info!(user_id = user.id, username = %user.username, role = %user.role, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login and issue an access token
///
/// # Endpoint
///
/// ```text
/// POST /auth/token
/// Content-Type: application/x-www-form-urlencoded
///
/// username=jane&password=SecureP@ss123
/// ```
///
/// # Response
///
/// ```json
/// { "access_token": "eyJ...", "token_type": "bearer" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> ApiResult<impl IntoResponse> {
    let Form(form) = form?;

    let Some(user) = authenticate_user(&state.db, &form.username, &form.password).await? else {
        warn!(username = %form.username, "Failed login attempt");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let ttl = state.config.jwt.access_token_ttl();
    let access_token =
        jwt::create_access_token(&user.username, user.id, &user.role, ttl, state.jwt_secret())?;

    let cookie = session_cookie(&access_token, ttl.num_seconds(), state.config.api.production);

    info!(user_id = user.id, "User logged in");

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        }),
    ))
}

/// Clears the access token cookie
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(header::SET_COOKIE, session_cookie("", 0, false))]),
    )
}

fn session_cookie(token: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        ACCESS_TOKEN_COOKIE, token, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
