/// Current user endpoints
///
/// - `GET /user/` - Caller's profile
/// - `PUT /user/password` - Change password (JSON)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskdesk_shared::{
    auth::{
        middleware::AuthContext,
        password::{
            hash_password_blocking, validate_password_length, verify_password_blocking,
            PasswordError,
        },
    },
    models::user::User,
};
use tracing::{info, warn};

/// Password change request
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password
    pub password: String,

    pub new_password: String,
}

/// Returns the caller's profile
pub async fn get_profile(State(state): State<AppState>, auth: AuthContext) -> ApiResult<Json<User>> {
    User::find_by_id(&state.db, auth.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Changes the caller's password
///
/// # Errors
///
/// - `401 Unauthorized`: Incorrect current password
/// - `400 Bad Request`: New password too short
/// - `404 Not Found`: User row no longer exists
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthContext,
    req: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = req?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let verified = match verify_password_blocking(req.password, user.hashed_password).await {
        Ok(matches) => matches,
        Err(PasswordError::InvalidHash(_)) => false,
        Err(e) => return Err(e.into()),
    };

    if !verified {
        warn!(user_id = auth.user_id, "Password change with wrong current password");
        return Err(ApiError::Unauthorized(
            "Incorrect current password".to_string(),
        ));
    }

    validate_password_length(&req.new_password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "new_password".to_string(),
            message,
        }])
    })?;

    let hashed = hash_password_blocking(req.new_password).await?;

    if !User::update_password(&state.db, auth.user_id, &hashed).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(user_id = auth.user_id, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}
