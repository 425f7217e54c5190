/// One handler per intent
///
/// Every handler runs a single operation against the caller's tasks and
/// formats a plain-text reply. Missing entities (no title, no task number)
/// are answered with a hint, not an error.

use sqlx::SqlitePool;
use tracing::debug;

use super::entities::{
    extract_category, extract_description, extract_marked_description, extract_new_title,
    extract_priority, extract_status, extract_task_id, extract_title, priority_opt,
    without_free_text,
};
use crate::auth::middleware::AuthContext;
use crate::models::category::Category;
use crate::models::task::{
    priority_label, CreateTask, Task, TaskStatus, UpdateTask, MAX_TITLE_LEN,
};

/// Most tasks listed in one reply
pub const LIST_LIMIT: usize = 10;

/// Error type for chatbot handlers
#[derive(Debug, thiserror::Error)]
pub enum ChatbotError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub const HELP_TEXT: &str = "\
Here's what I can do:
- Create task: Buy milk (add \"with high priority\" or \"description: ...\")
- Update task 3 to done / set task 3 priority 1 / change task 3 title to ...
- Delete task 3
- List my tasks (optionally: list completed tasks)
- Status: a count of your tasks by status
- Help: show this message";

fn title_too_long(title: &str) -> Option<String> {
    (title.chars().count() > MAX_TITLE_LEN)
        .then(|| format!("That title is too long. Keep it to {MAX_TITLE_LEN} characters or fewer."))
}

fn status_phrase(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::Progress => "in progress",
        TaskStatus::Completed => "completed",
    }
}

pub async fn handle_create(
    pool: &SqlitePool,
    ctx: &AuthContext,
    message: &str,
) -> Result<String, ChatbotError> {
    let Some(title) = extract_title(message) else {
        return Ok(
            "What should the task be called? Try: Create task: Buy milk".to_string(),
        );
    };
    if let Some(hint) = title_too_long(&title) {
        return Ok(hint);
    }

    let categories = Category::list(pool).await?;
    let category = extract_category(message, &categories);

    let task = Task::create(
        pool,
        ctx.user_id,
        CreateTask {
            title,
            description: extract_description(message),
            priority: extract_priority(message),
            category_id: category.map(|c| c.id),
            ..CreateTask::default()
        },
    )
    .await?;

    let mut reply = format!(
        "Created task #{}: {} (priority: {}",
        task.id,
        task.title,
        task.priority_label()
    );
    if let Some(category) = category {
        reply.push_str(&format!(", category: {}", category.name));
    }
    reply.push(')');
    Ok(reply)
}

pub async fn handle_update(
    pool: &SqlitePool,
    ctx: &AuthContext,
    message: &str,
) -> Result<String, ChatbotError> {
    let Some(id) = extract_task_id(message) else {
        return Ok(
            "Which task should I update? Include its number, e.g. \"Mark task 3 as done\""
                .to_string(),
        );
    };

    let Some(task) = Task::find_for_owner(pool, id, ctx.user_id).await? else {
        return Ok(format!("I couldn't find task #{id}."));
    };

    let keywords = without_free_text(message);
    let mut changes = UpdateTask::from(&task);
    let mut summary = Vec::new();

    if let Some(status) = extract_status(&keywords) {
        changes.status = status;
        summary.push(format!("status: {}", status_phrase(status)));
    }
    if let Some(priority) = priority_opt(&keywords) {
        changes.priority = priority;
        summary.push(format!("priority: {}", priority_label(priority)));
    }
    if let Some(title) = extract_new_title(message) {
        if let Some(hint) = title_too_long(&title) {
            return Ok(hint);
        }
        summary.push(format!("title: {title}"));
        changes.title = title;
    }
    if let Some(description) = extract_marked_description(message) {
        summary.push("description updated".to_string());
        changes.description = Some(description);
    }

    if summary.is_empty() {
        return Ok(format!(
            "What should I change on task #{id}? You can set its status, priority, title or description."
        ));
    }

    let Some(updated) = Task::update(pool, id, ctx.user_id, changes).await? else {
        return Ok(format!("I couldn't find task #{id}."));
    };

    Ok(format!(
        "Updated task #{}: {} ({})",
        updated.id,
        updated.title,
        summary.join(", ")
    ))
}

pub async fn handle_delete(
    pool: &SqlitePool,
    ctx: &AuthContext,
    message: &str,
) -> Result<String, ChatbotError> {
    let Some(id) = extract_task_id(message) else {
        return Ok(
            "Which task should I delete? Include its number, e.g. \"Delete task 3\"".to_string(),
        );
    };

    if Task::delete_for_owner(pool, id, ctx.user_id).await? {
        Ok(format!("Deleted task #{id}."))
    } else {
        Ok(format!("I couldn't find task #{id}."))
    }
}

pub async fn handle_list(
    pool: &SqlitePool,
    ctx: &AuthContext,
    message: &str,
) -> Result<String, ChatbotError> {
    let status = extract_status(message);
    let tasks: Vec<Task> = Task::list_for_owner(pool, ctx.user_id)
        .await?
        .into_iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .collect();

    let label = status.map(|s| format!("{} ", status_phrase(s))).unwrap_or_default();

    if tasks.is_empty() {
        return Ok(format!("You have no {label}tasks."));
    }

    let mut lines = vec![format!("Your {label}tasks ({}):", tasks.len())];
    lines.extend(tasks.iter().take(LIST_LIMIT).map(|t| {
        format!(
            "#{} {} [{}] (priority: {})",
            t.id,
            t.title,
            status_phrase(t.status),
            t.priority_label()
        )
    }));
    if tasks.len() > LIST_LIMIT {
        lines.push(format!("...and {} more", tasks.len() - LIST_LIMIT));
    }

    Ok(lines.join("\n"))
}

pub async fn handle_status(pool: &SqlitePool, ctx: &AuthContext) -> Result<String, ChatbotError> {
    let counts = Task::count_by_status(pool, ctx.user_id).await?;
    debug!(user_id = ctx.user_id, total = counts.total, "Chatbot status summary");

    Ok(format!(
        "You have {} tasks: {} pending, {} in progress, {} completed.",
        counts.total, counts.pending, counts.progress, counts.completed
    ))
}

pub fn handle_help() -> String {
    HELP_TEXT.to_string()
}

pub fn handle_greeting(ctx: &AuthContext) -> String {
    format!(
        "Hello {}! I can help you manage your tasks. Type \"help\" to see what I can do.",
        ctx.username
    )
}

pub fn handle_unknown() -> String {
    "I'm not sure what you mean. Type \"help\" to see the commands I understand.".to_string()
}
