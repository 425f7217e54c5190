/// Category model
///
/// Categories are a single global list shared by all users. Deleting one
/// detaches its tasks (category_id becomes NULL) in the same transaction; tasks
/// are never removed along with their category.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Error type for category operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// A category with this name already exists
    #[error("Category already exists")]
    AlreadyExists,

    #[error("Category not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    /// Creates a category
    ///
    /// # Errors
    ///
    /// `CategoryError::AlreadyExists` if the name is taken
    pub async fn create(pool: &SqlitePool, name: &str) -> Result<Self, CategoryError> {
        let name = name.trim();

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            return Err(CategoryError::AlreadyExists);
        }

        let result = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(pool)
        .await;

        match result {
            Ok(category) => Ok(category),
            // Lost a race with a concurrent insert of the same name
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(CategoryError::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All categories ordered by name
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name, id")
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a category after detaching every task that references it
    ///
    /// # Errors
    ///
    /// `CategoryError::NotFound` if no category has this ID
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), CategoryError> {
        let mut tx = pool.begin().await?;

        let detached = sqlx::query("UPDATE todo_items SET category_id = NULL WHERE category_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Dropping tx rolls back the (no-op) detach
            return Err(CategoryError::NotFound);
        }

        tx.commit().await?;
        tracing::info!(category_id = id, detached_tasks = detached, "Deleted category");
        Ok(())
    }
}

/// Lookup table from category ID to name
pub fn name_index(categories: &[Category]) -> HashMap<i64, &str> {
    categories.iter().map(|c| (c.id, c.name.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_index() {
        let categories = vec![
            Category { id: 1, name: "Work".to_string() },
            Category { id: 7, name: "Home".to_string() },
        ];
        let index = name_index(&categories);
        assert_eq!(index.get(&7), Some(&"Home"));
        assert_eq!(index.get(&2), None);
    }

    #[test]
    fn test_category_error_display() {
        assert_eq!(CategoryError::AlreadyExists.to_string(), "Category already exists");
        assert_eq!(CategoryError::NotFound.to_string(), "Category not found");
    }
}
