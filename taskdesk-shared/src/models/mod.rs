/// Database models for TaskDesk
///
/// # Models
///
/// - `user`: User accounts, roles and password hashes
/// - `task`: Todo items, their status workflow and owner-scoped queries
/// - `category`: Global task categories
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::task::{CreateTask, Task};
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example(owner_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, owner_id, CreateTask {
///     title: "Water the plants".to_string(),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod user;
pub mod task;
pub mod category;
