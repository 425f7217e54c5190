/// User model and database operations
///
/// Users own todo items and carry a free-text role that the RBAC layer
/// ranks (see [`crate::auth::authorization`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     email TEXT NOT NULL UNIQUE,
///     username TEXT NOT NULL UNIQUE,
///     first_name TEXT,
///     last_name TEXT,
///     hashed_password TEXT NOT NULL,
///     is_active BOOLEAN NOT NULL DEFAULT 1,
///     role TEXT NOT NULL DEFAULT 'user'
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdesk_shared::models::user::{User, CreateUser};
/// use taskdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "jane@example.com".to_string(),
///     username: "jane".to_string(),
///     first_name: Some("Jane".to_string()),
///     last_name: Some("Doe".to_string()),
///     role: "user".to_string(),
///     hashed_password: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_username(&pool, "jane").await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, hashed_password, is_active, role";

/// User account
///
/// The password hash never leaves the server: it is skipped on serialization.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Email address, unique across all users
    pub email: String,

    /// Login name, unique across all users
    pub username: String,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub hashed_password: String,

    pub is_active: bool,

    /// Free-text role ("user", "manager", "admin", ...)
    pub role: String,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub hashed_password: String,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the email or username already exists (unique
    /// constraint violation) or the database is unreachable.
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, username, first_name, last_name, hashed_password, is_active, role)
             VALUES (?, ?, ?, ?, ?, 1, ?)
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(data.email)
            .bind(data.username)
            .bind(data.first_name)
            .bind(data.last_name)
            .bind(data.hashed_password)
            .bind(data.role)
            .fetch_one(pool)
            .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by login name
    ///
    /// The lookup is exact (case-sensitive), matching how usernames are
    /// stored at registration.
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Replaces the stored password hash
    ///
    /// # Returns
    ///
    /// True if the user existed and was updated
    pub async fn update_password(
        pool: &SqlitePool,
        id: i64,
        hashed_password: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET hashed_password = ? WHERE id = ?")
            .bind(hashed_password)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// "First Last", falling back to the username when both are blank
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: 1,
            email: "a@example.com".to_string(),
            username: "alice".to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            hashed_password: "hash".to_string(),
            is_active: true,
            role: "user".to_string(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user(Some("Alice"), Some("Smith")).display_name(), "Alice Smith");
        assert_eq!(user(Some("Alice"), None).display_name(), "Alice");
        assert_eq!(user(None, None).display_name(), "alice");
        assert_eq!(user(Some(" "), Some("")).display_name(), "alice");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(user(None, None)).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["username"], "alice");
    }

    // Database operations are covered in tests/models_tests.rs
}
