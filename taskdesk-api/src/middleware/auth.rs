/// Authentication and role gates
///
/// [`jwt_auth_layer`] resolves the caller from a bearer header or the
/// `access_token` cookie and stores the [`AuthContext`] in the request
/// extensions. [`require_admin`] runs after it on admin routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use taskdesk_shared::auth::authorization::{require_role, ADMIN_ROLES};
use taskdesk_shared::auth::middleware::{authenticate, AuthContext};
use tracing::{debug, warn};

use crate::{app::AppState, error::ApiError};

/// JWT authentication middleware layer
///
/// Missing or invalid tokens are rejected with 401 before any handler runs.
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret()).map_err(|e| {
        debug!(error = %e, path = %req.uri().path(), "Authentication failed");
        e
    })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Admin role gate
///
/// Must be layered inside [`jwt_auth_layer`]. Without a resolved caller the
/// extractor rejects with 401; a non-admin role gets 403.
pub async fn require_admin(
    auth: AuthContext,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(e) = require_role(&auth, &ADMIN_ROLES) {
        warn!(user_id = auth.user_id, role = %auth.role, "Admin access denied");
        return Err(e.into());
    }

    Ok(next.run(req).await)
}
