/// Todo item model and database operations
///
/// Every operation except the `*_any` / `list_all` admin variants is scoped to
/// an owner: a task that exists but belongs to someone else behaves exactly
/// like a task that does not exist.
///
/// # Status
///
/// ```text
/// pending ⇄ progress ⇄ completed   (any status may be set directly)
/// toggle: completed → pending, pending|progress → completed
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todo_items (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     description TEXT,
///     priority INTEGER NOT NULL DEFAULT 3,
///     status TEXT NOT NULL DEFAULT 'pending',
///     owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
///     due_date TEXT,
///     tags TEXT,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::task::{CreateTask, Task, TaskStatus};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, owner_id: i64) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, owner_id, CreateTask {
///     title: "Buy milk".to_string(),
///     ..Default::default()
/// }).await?;
///
/// Task::set_status(&pool, task.id, owner_id, TaskStatus::Progress).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::fmt;
use std::str::FromStr;

use crate::listing::TaskQuery;

/// Priority assigned when none is given (Low)
pub const DEFAULT_PRIORITY: i32 = 3;

/// Longest allowed title, in characters
pub const MAX_TITLE_LEN: usize = 100;

const TASK_COLUMNS: &str = "id, title, description, priority, status, owner_id, category_id, \
                            due_date, tags, created_at, updated_at";

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Pending,

    /// In progress
    Progress,

    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::Progress, TaskStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Progress => "progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Status after a complete/incomplete toggle
    ///
    /// Completed goes back to pending; pending and in-progress both complete.
    pub fn toggled(&self) -> TaskStatus {
        match self {
            TaskStatus::Completed => TaskStatus::Pending,
            TaskStatus::Pending | TaskStatus::Progress => TaskStatus::Completed,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for status strings outside the known set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown task status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "progress" => Ok(TaskStatus::Progress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Human label for a priority value; out-of-range values read as Low
pub fn priority_label(priority: i32) -> &'static str {
    match priority {
        1 => "High",
        2 => "Medium",
        _ => "Low",
    }
}

/// Todo item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,

    /// 1 = High, 2 = Medium, 3 = Low
    pub priority: i32,

    pub status: TaskStatus,

    /// Owning user; set at creation and never changed
    pub owner_id: i64,

    pub category_id: Option<i64>,
    pub due_date: Option<NaiveDate>,

    /// Comma-separated tag list
    pub tags: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn priority_label(&self) -> &'static str {
        priority_label(self.priority)
    }

    /// Tags split on commas, trimmed, empties dropped
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Due before `today` and not yet completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: i32,
    pub category_id: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub tags: Option<String>,
}

impl Default for CreateTask {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            priority: DEFAULT_PRIORITY,
            category_id: None,
            due_date: None,
            tags: None,
        }
    }
}

/// Full replacement of a task's editable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: i32,
    pub status: TaskStatus,
    pub category_id: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub tags: Option<String>,
}

impl From<&Task> for UpdateTask {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            status: task.status,
            category_id: task.category_id,
            due_date: task.due_date,
            tags: task.tags.clone(),
        }
    }
}

/// Task counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub progress: i64,
    pub completed: i64,
}

impl StatusCounts {
    /// Tallies an in-memory task list
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts = StatusCounts::default();
        for task in tasks {
            counts.add(task.status, 1);
        }
        counts
    }

    fn add(&mut self, status: TaskStatus, n: i64) {
        self.total += n;
        match status {
            TaskStatus::Pending => self.pending += n,
            TaskStatus::Progress => self.progress += n,
            TaskStatus::Completed => self.completed += n,
        }
    }

    pub fn get(&self, status: TaskStatus) -> i64 {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::Progress => self.progress,
            TaskStatus::Completed => self.completed,
        }
    }
}

impl Task {
    /// Creates a task owned by `owner_id` in pending status
    ///
    /// # Errors
    ///
    /// Returns an error if the owner or category does not exist (foreign key
    /// violation) or the database is unreachable.
    pub async fn create(
        pool: &SqlitePool,
        owner_id: i64,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO todo_items
                (title, description, priority, status, owner_id, category_id, due_date, tags, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {TASK_COLUMNS}"
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.priority)
            .bind(TaskStatus::Pending)
            .bind(owner_id)
            .bind(data.category_id)
            .bind(data.due_date)
            .bind(data.tags)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await?;

        tracing::debug!(task_id = task.id, owner_id, "Created task");
        Ok(task)
    }

    /// Finds a task by ID within the owner's tasks
    pub async fn find_for_owner(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM todo_items WHERE id = ? AND owner_id = ?");

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// All of the owner's tasks, newest first
    pub async fn list_for_owner(pool: &SqlitePool, owner_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM todo_items WHERE owner_id = ? ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Replaces every editable field of an owned task
    ///
    /// # Returns
    ///
    /// The updated task, or None if it does not exist or is not owned
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE todo_items
             SET title = ?, description = ?, priority = ?, status = ?, category_id = ?,
                 due_date = ?, tags = ?, updated_at = ?
             WHERE id = ? AND owner_id = ?
             RETURNING {TASK_COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.priority)
            .bind(data.status)
            .bind(data.category_id)
            .bind(data.due_date)
            .bind(data.tags)
            .bind(Utc::now())
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Writes only the status of an owned task
    pub async fn set_status(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE todo_items SET status = ?, updated_at = ?
             WHERE id = ? AND owner_id = ?
             RETURNING {TASK_COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Flips an owned task between completed and pending
    ///
    /// Read and write happen in one transaction.
    pub async fn toggle_complete(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<TaskStatus> =
            sqlx::query_scalar("SELECT status FROM todo_items WHERE id = ? AND owner_id = ?")
                .bind(id)
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE todo_items SET status = ?, updated_at = ? WHERE id = ? RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(current.toggled())
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(task))
    }

    /// Deletes an owned task
    ///
    /// # Returns
    ///
    /// True if a row was removed
    pub async fn delete_for_owner(
        pool: &SqlitePool,
        id: i64,
        owner_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todo_items WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every task in the system, newest first (admin view)
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM todo_items ORDER BY created_at DESC, id DESC");

        sqlx::query_as::<_, Task>(&query).fetch_all(pool).await
    }

    /// Deletes any task regardless of owner (admin view)
    pub async fn delete_any(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todo_items WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts the owner's tasks by status
    pub async fn count_by_status(
        pool: &SqlitePool,
        owner_id: i64,
    ) -> Result<StatusCounts, sqlx::Error> {
        let rows: Vec<(TaskStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM todo_items WHERE owner_id = ? GROUP BY status",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, n) in rows {
            counts.add(status, n);
        }
        Ok(counts)
    }

    /// One page of the owner's tasks matching `query`, plus the total match count
    pub async fn search(
        pool: &SqlitePool,
        owner_id: i64,
        query: &TaskQuery,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let mut count_builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM todo_items");
        push_filters(&mut count_builder, owner_id, query);
        let total: i64 = count_builder.build_query_scalar().fetch_one(pool).await?;

        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {TASK_COLUMNS} FROM todo_items"));
        push_filters(&mut builder, owner_id, query);

        let column = query.sort_by.column();
        let direction = query.sort_order.as_sql();
        builder.push(format!(" ORDER BY {column} {direction}, id {direction}"));
        builder.push(" LIMIT ");
        builder.push_bind(query.per_page as i64);
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        let tasks = builder.build_query_as::<Task>().fetch_all(pool).await?;

        tracing::debug!(
            owner_id,
            total,
            returned = tasks.len(),
            page = query.page,
            "Task search"
        );

        Ok((tasks, total))
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, owner_id: i64, query: &TaskQuery) {
    builder.push(" WHERE owner_id = ");
    builder.push_bind(owner_id);

    if let Some(pattern) = query.search_pattern() {
        builder.push(" AND (title LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR COALESCE(description, '') LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR COALESCE(tags, '') LIKE ");
        builder.push_bind(pattern);
        builder.push(" ESCAPE '\\')");
    }

    if let Some(status) = query.status {
        builder.push(" AND status = ");
        builder.push_bind(status);
    }

    if let Some(category_id) = query.category_id {
        builder.push(" AND category_id = ");
        builder.push_bind(category_id);
    }

    if let Some(priority) = query.priority {
        builder.push(" AND priority = ");
        builder.push_bind(priority);
    }
}
