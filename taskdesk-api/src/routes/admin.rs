/// Admin endpoints
///
/// Every task regardless of owner. The router gates these behind the admin
/// role check, so handlers assume an admin caller.
///
/// - `GET /admin/todo`
/// - `DELETE /admin/todo/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use taskdesk_shared::{auth::middleware::AuthContext, models::task::Task};
use tracing::info;

pub async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_all(&state.db).await?;
    Ok(Json(tasks))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !Task::delete_any(&state.db, id).await? {
        return Err(ApiError::NotFound("Todo not found".to_string()));
    }

    info!(admin_id = auth.user_id, task_id = id, "Admin deleted todo");

    Ok(StatusCode::NO_CONTENT)
}
