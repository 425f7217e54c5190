/// Dashboard endpoints
///
/// Read-only views over the caller's tasks. Each handler loads the task list
/// once and aggregates in memory with `taskdesk_shared::dashboard`.
///
/// # Endpoints
///
/// - `GET /dashboard/` - Page data (stats, recent tasks, analytics, listing)
/// - `GET /dashboard/api/analytics?period=week|month|year`
/// - `GET /dashboard/api/project-categories`
/// - `GET /dashboard/api/today-tasks`
/// - `GET /dashboard/api/summary`
/// - `GET /dashboard/api/all-tasks?status=`
/// - `POST /dashboard/api/task/:id/toggle`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{lenient, ListingParams},
    routes::todos::{load_listing, Listing, TodoView},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use taskdesk_shared::{
    auth::{
        authorization::{is_admin, is_manager_or_above},
        middleware::AuthContext,
    },
    dashboard::{
        category_breakdown, created_on, daily_created, task_stats, time_ago, AnalyticsPeriod,
        CategoryShare, DailyCount, Summary, TaskStats, RECENT_TASK_LIMIT,
    },
    models::{
        category::Category,
        task::{Task, TaskStatus},
        user::User,
    },
};
use tracing::debug;

/// Dashboard page data
#[derive(Debug, Serialize)]
pub struct DashboardPage {
    /// "First Last", or the username
    pub user_name: String,

    /// Role with the first letter capitalised
    pub user_title: String,

    pub recent_tasks: Vec<TodoView>,
    pub stats: TaskStats,
    pub category_stats: Vec<CategoryShare>,

    /// Last seven days of task creation
    pub analytics: Vec<DailyCount>,

    pub is_admin: bool,
    pub is_manager: bool,
    pub listing: Listing,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub days: u32,
    pub data: Vec<DailyCount>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryShare>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct TodayTask {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub time_ago: String,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct TodayTasksResponse {
    pub tasks: Vec<TodayTask>,
}

#[derive(Debug, Deserialize)]
pub struct AllTasksParams {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Serialize)]
pub struct AllTasksResponse {
    pub tasks: Vec<TodoView>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub status: &'static str,
    pub new_status: TaskStatus,
}

fn title_case(role: &str) -> String {
    let mut chars = role.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ListingParams>,
) -> ApiResult<Json<DashboardPage>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let tasks = Task::list_for_owner(&state.db, auth.user_id).await?;
    let categories = Category::list(&state.db).await?;
    let listing = load_listing(&state.db, auth.user_id, &params.to_query()).await?;
    let today = Utc::now().date_naive();

    let page = DashboardPage {
        user_name: user.display_name(),
        user_title: title_case(&user.role),
        stats: task_stats(&tasks, today),
        category_stats: category_breakdown(&tasks, &categories),
        analytics: daily_created(&tasks, today, AnalyticsPeriod::Week.days()),
        is_admin: is_admin(&auth),
        is_manager: is_manager_or_above(state.roles(), &auth),
        recent_tasks: tasks
            .into_iter()
            .take(RECENT_TASK_LIMIT)
            .map(|t| TodoView::new(t, today))
            .collect(),
        listing,
    };

    Ok(Json(page))
}

/// Tasks created per day over the requested period, oldest first
pub async fn analytics(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<AnalyticsParams>,
) -> ApiResult<Json<AnalyticsResponse>> {
    let period = AnalyticsPeriod::parse(params.period.as_deref().unwrap_or_default());
    let tasks = Task::list_for_owner(&state.db, auth.user_id).await?;

    Ok(Json(AnalyticsResponse {
        days: period.days(),
        data: daily_created(&tasks, Utc::now().date_naive(), period.days()),
    }))
}

pub async fn project_categories(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<CategoriesResponse>> {
    let tasks = Task::list_for_owner(&state.db, auth.user_id).await?;
    let categories = Category::list(&state.db).await?;

    Ok(Json(CategoriesResponse {
        categories: category_breakdown(&tasks, &categories),
        total: tasks.len() as i64,
    }))
}

/// Tasks created today, newest first
pub async fn today_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<TodayTasksResponse>> {
    let tasks = Task::list_for_owner(&state.db, auth.user_id).await?;
    let now = Utc::now();

    let tasks = created_on(&tasks, now.date_naive())
        .into_iter()
        .map(|t| TodayTask {
            id: t.id,
            title: t.title.clone(),
            status: t.status,
            time_ago: time_ago(t.created_at, now),
            completed: t.status == TaskStatus::Completed,
        })
        .collect();

    Ok(Json(TodayTasksResponse { tasks }))
}

pub async fn summary(State(state): State<AppState>, auth: AuthContext) -> ApiResult<Json<Summary>> {
    let tasks = Task::list_for_owner(&state.db, auth.user_id).await?;
    let stats = task_stats(&tasks, Utc::now().date_naive());

    Ok(Json(Summary::from(stats)))
}

/// Caller's tasks, newest first
///
/// The `status` filter only applies to admin callers; everyone else gets the
/// full list.
pub async fn all_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<AllTasksParams>,
) -> ApiResult<Json<AllTasksResponse>> {
    let tasks = Task::list_for_owner(&state.db, auth.user_id).await?;
    let today = Utc::now().date_naive();

    let status = params.status.filter(|_| is_admin(&auth));
    if params.status.is_some() && status.is_none() {
        debug!(user_id = auth.user_id, "Status filter ignored for non-admin");
    }

    let tasks = tasks
        .into_iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .map(|t| TodoView::new(t, today))
        .collect();

    Ok(Json(AllTasksResponse { tasks }))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<ToggleResponse>> {
    let task = Task::toggle_complete(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(ToggleResponse {
        status: "success",
        new_status: task.status,
    }))
}
