/// Todo item endpoints
///
/// Every operation is scoped to the authenticated caller: a task owned by
/// someone else is indistinguishable from a missing one (404).
///
/// # Endpoints
///
/// - `GET /todos/todo-page` - Filtered, sorted, paginated listing
/// - `POST /todos/todo` - Create (form)
/// - `GET /todos/todo/:id` - Fetch one
/// - `POST /todos/todo/:id/update` - Full replace (form)
/// - `POST /todos/todo/:id/delete` - Delete
/// - `POST /todos/todo/:id/quick-status` - Set status only (form)
/// - `POST /todos/todo/:id/toggle-complete` - Flip completion
/// - `GET /todos/export?format=csv|json` - Download all tasks
/// - `POST /todos/category` - Create category (form)
/// - `POST /todos/category/:id/delete` - Delete category

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms::{empty_string_as_none, lenient, ListingParams},
};
use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Form, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use taskdesk_shared::{
    auth::middleware::AuthContext,
    export::{self, ExportFormat},
    listing::{PageInfo, SortField, SortOrder, TaskQuery},
    models::{
        category::Category,
        task::{CreateTask, StatusCounts, Task, TaskStatus, UpdateTask, DEFAULT_PRIORITY},
    },
};
use tracing::{debug, info};
use validator::Validate;

const TODO_NOT_FOUND: &str = "Todo not found";

/// Task as returned to clients
#[derive(Debug, Serialize)]
pub struct TodoView {
    #[serde(flatten)]
    pub task: Task,

    /// High, Medium or Low
    pub priority_label: &'static str,

    /// Due before today and not completed
    pub is_overdue: bool,
}

impl TodoView {
    pub fn new(task: Task, today: NaiveDate) -> Self {
        Self {
            priority_label: task.priority_label(),
            is_overdue: task.is_overdue(today),
            task,
        }
    }
}

/// Filters echoed back with a listing
#[derive(Debug, Serialize)]
pub struct Filters {
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub category_id: Option<i64>,
    pub priority: Option<i32>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl From<&TaskQuery> for Filters {
    fn from(query: &TaskQuery) -> Self {
        Self {
            search: query.search.clone(),
            status: query.status,
            category_id: query.category_id,
            priority: query.priority,
            sort_by: query.sort_by,
            sort_order: query.sort_order,
        }
    }
}

/// One page of the caller's tasks with everything the list view needs
#[derive(Debug, Serialize)]
pub struct Listing {
    pub todos: Vec<TodoView>,

    /// Counts over all of the caller's tasks, not just this page
    pub stats: StatusCounts,

    pub categories: Vec<Category>,
    pub filters: Filters,
    pub pagination: PageInfo,
}

/// Runs a listing query for `owner_id`
pub(crate) async fn load_listing(
    db: &SqlitePool,
    owner_id: i64,
    query: &TaskQuery,
) -> ApiResult<Listing> {
    let (tasks, total) = Task::search(db, owner_id, query).await?;
    let stats = Task::count_by_status(db, owner_id).await?;
    let categories = Category::list(db).await?;
    let today = Utc::now().date_naive();

    debug!(owner_id, total, page = query.page, "Loaded task listing");

    Ok(Listing {
        todos: tasks.into_iter().map(|t| TodoView::new(t, today)).collect(),
        stats,
        categories,
        filters: Filters::from(query),
        pagination: PageInfo::new(query.page, query.per_page, total),
    })
}

/// Create/update form
///
/// Blank optional fields are absent. An unparseable due date is dropped
/// rather than rejected.
#[derive(Debug, Deserialize, Validate)]
pub struct TodoForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(range(min = 1, max = 3, message = "Priority must be between 1 and 3"))]
    pub priority: Option<i32>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub tags: Option<String>,

    /// Update only; defaults to pending
    #[serde(default, deserialize_with = "lenient")]
    pub todo_status: Option<TaskStatus>,
}

impl TodoForm {
    fn validated(mut self) -> ApiResult<Self> {
        self.title = self.title.trim().to_string();
        self.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct QuickStatusForm {
    /// Unknown values leave the task unchanged
    #[serde(default, deserialize_with = "lenient")]
    pub new_status: Option<TaskStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Category name must be 1-100 characters"))]
    pub name: String,
}

/// Listing page
///
/// # Query Parameters
///
/// `search`, `status`, `category_id`, `priority`, `sort_by`, `sort_order`,
/// `page`, `per_page`. Malformed values fall back to their defaults.
pub async fn todo_page(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ListingParams>,
) -> ApiResult<Json<Listing>> {
    let listing = load_listing(&state.db, auth.user_id, &params.to_query()).await?;
    Ok(Json(listing))
}

pub async fn create_todo(
    State(state): State<AppState>,
    auth: AuthContext,
    form: Result<Form<TodoForm>, FormRejection>,
) -> ApiResult<(StatusCode, Json<TodoView>)> {
    let Form(form) = form?;
    let form = form.validated()?;

    let task = Task::create(
        &state.db,
        auth.user_id,
        CreateTask {
            title: form.title,
            description: form.description,
            priority: form.priority.unwrap_or(DEFAULT_PRIORITY),
            category_id: form.category_id,
            due_date: form.due_date,
            tags: form.tags,
        },
    )
    .await?;

    info!(user_id = auth.user_id, task_id = task.id, "Todo created");

    Ok((
        StatusCode::CREATED,
        Json(TodoView::new(task, Utc::now().date_naive())),
    ))
}

pub async fn get_todo(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<TodoView>> {
    let task = Task::find_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(TODO_NOT_FOUND.to_string()))?;

    Ok(Json(TodoView::new(task, Utc::now().date_naive())))
}

/// Replaces every editable field of the task
pub async fn update_todo(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    form: Result<Form<TodoForm>, FormRejection>,
) -> ApiResult<Json<TodoView>> {
    let Form(form) = form?;
    let form = form.validated()?;

    let task = Task::update(
        &state.db,
        id,
        auth.user_id,
        UpdateTask {
            title: form.title,
            description: form.description,
            priority: form.priority.unwrap_or(DEFAULT_PRIORITY),
            status: form.todo_status.unwrap_or_default(),
            category_id: form.category_id,
            due_date: form.due_date,
            tags: form.tags,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(TODO_NOT_FOUND.to_string()))?;

    info!(user_id = auth.user_id, task_id = id, "Todo updated");

    Ok(Json(TodoView::new(task, Utc::now().date_naive())))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !Task::delete_for_owner(&state.db, id, auth.user_id).await? {
        return Err(ApiError::NotFound(TODO_NOT_FOUND.to_string()));
    }

    info!(user_id = auth.user_id, task_id = id, "Todo deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn quick_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
    form: Result<Form<QuickStatusForm>, FormRejection>,
) -> ApiResult<Json<TodoView>> {
    let Form(form) = form?;

    let task = match form.new_status {
        Some(status) => Task::set_status(&state.db, id, auth.user_id, status).await?,
        None => {
            debug!(task_id = id, "Ignoring unknown quick status");
            Task::find_for_owner(&state.db, id, auth.user_id).await?
        }
    }
    .ok_or_else(|| ApiError::NotFound(TODO_NOT_FOUND.to_string()))?;

    Ok(Json(TodoView::new(task, Utc::now().date_naive())))
}

pub async fn toggle_complete(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<Json<TodoView>> {
    let task = Task::toggle_complete(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(TODO_NOT_FOUND.to_string()))?;

    debug!(task_id = id, status = %task.status, "Todo toggled");

    Ok(Json(TodoView::new(task, Utc::now().date_naive())))
}

/// Downloads all of the caller's tasks as CSV (default) or JSON
pub async fn export_todos(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<ExportParams>,
) -> ApiResult<impl IntoResponse> {
    let format = match params.format.as_deref() {
        Some(value) => value.parse::<ExportFormat>()?,
        None => ExportFormat::default(),
    };

    let tasks = Task::list_for_owner(&state.db, auth.user_id).await?;
    let categories = Category::list(&state.db).await?;
    let body = export::render(format, &tasks, &categories)?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        format.filename(Utc::now().date_naive())
    );

    info!(user_id = auth.user_id, count = tasks.len(), "Todos exported");

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthContext,
    form: Result<Form<CategoryForm>, FormRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Form(mut form) = form?;
    form.name = form.name.trim().to_string();
    form.validate()?;

    let category = Category::create(&state.db, &form.name).await?;

    info!(user_id = auth.user_id, category_id = category.id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// Deletes a category; tasks that referenced it become uncategorized
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    Category::delete(&state.db, id).await?;

    info!(user_id = auth.user_id, category_id = id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
