//! Category repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use menulane_core::{CategoryId, UserId};

use super::RepositoryError;
use crate::models::category::Category;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    user_id: i32,
    name: String,
    description: Option<String>,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            description: row.description,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CATEGORY_COLUMNS: &str =
    "id, user_id, name, description, sort_order, created_at, updated_at";

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories for a user in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Category>, RepositoryError> {
        let sql = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE user_id = $1 ORDER BY sort_order, id"
        );

        let rows: Vec<CategoryRow> = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Create a new category, placed at the end of the display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let sql = format!(
            "INSERT INTO categories (user_id, name, description, sort_order)
             VALUES ($1, $2, $3,
                     (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM categories WHERE user_id = $1))
             RETURNING {CATEGORY_COLUMNS}"
        );

        let row: CategoryRow = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .bind(name)
            .bind(description)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Rename a category or change its description.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist for
    /// the user.
    pub async fn update(
        &self,
        user_id: UserId,
        id: CategoryId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let sql = format!(
            "UPDATE categories
             SET name = $1, description = $2, updated_at = NOW()
             WHERE id = $3 AND user_id = $4
             RETURNING {CATEGORY_COLUMNS}"
        );

        let row: Option<CategoryRow> = sqlx::query_as(&sql)
            .bind(name)
            .bind(description)
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(Category::from).ok_or(RepositoryError::NotFound)
    }

    /// Apply a new display order.
    ///
    /// `ordered_ids` lists the user's category ids in the desired order;
    /// ids not owned by the user are ignored by the scoped update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the transaction fails.
    pub async fn reorder(
        &self,
        user_id: UserId,
        ordered_ids: &[CategoryId],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for (index, id) in ordered_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE categories SET sort_order = $1, updated_at = NOW()
                 WHERE id = $2 AND user_id = $3",
            )
            .bind(i32::try_from(index).unwrap_or(i32::MAX))
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a category.
    ///
    /// Items referencing it keep their (denormalized) category name.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, user_id: UserId, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
