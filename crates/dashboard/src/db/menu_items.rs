//! Menu item repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use menulane_core::{MenuItemId, Money, UserId};

use super::RepositoryError;
use crate::models::menu_item::{MenuItem, SubItem};

/// Fields for creating or updating a menu item.
#[derive(Debug, Clone)]
pub struct MenuItemInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub is_combo: bool,
    pub sub_items: Vec<SubItem>,
    pub is_available: bool,
}

#[derive(sqlx::FromRow)]
struct MenuItemRow {
    id: i32,
    user_id: i32,
    name: String,
    description: Option<String>,
    price: i64,
    category: Option<String>,
    images: Json<Vec<String>>,
    is_combo: bool,
    sub_items: Json<Vec<SubItem>>,
    is_available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: MenuItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            description: row.description,
            price: Money::from_minor(row.price),
            category: row.category,
            images: row.images.0,
            is_combo: row.is_combo,
            sub_items: row.sub_items.0,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ITEM_COLUMNS: &str = "id, user_id, name, description, price, category, images, \
     is_combo, sub_items, is_available, created_at, updated_at";

/// Repository for menu item database operations.
///
/// All operations are scoped by the owning user.
pub struct MenuItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MenuItemRepository<'a> {
    /// Create a new menu item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Number of items the user currently has, for plan-cap checks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM menu_items WHERE user_id = $1")
                .bind(user_id.as_i32())
                .fetch_one(self.pool)
                .await?;

        Ok(count.0)
    }

    /// All items for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<MenuItem>, RepositoryError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items WHERE user_id = $1 ORDER BY created_at DESC"
        );

        let rows: Vec<MenuItemRow> = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Get one item, scoped by owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        id: MenuItemId,
    ) -> Result<Option<MenuItem>, RepositoryError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items WHERE id = $1 AND user_id = $2"
        );

        let row: Option<MenuItemRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(MenuItem::from))
    }

    /// Create a new menu item.
    ///
    /// Plan caps are enforced by the caller before this runs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &MenuItemInput,
    ) -> Result<MenuItem, RepositoryError> {
        let sql = format!(
            "INSERT INTO menu_items
                 (user_id, name, description, price, category, images, is_combo, sub_items, is_available)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ITEM_COLUMNS}"
        );

        let row: MenuItemRow = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price.as_minor())
            .bind(&input.category)
            .bind(Json(&input.images))
            .bind(input.is_combo)
            .bind(Json(&input.sub_items))
            .bind(input.is_available)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }

    /// Overwrite an item's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist for the
    /// user.
    pub async fn update(
        &self,
        user_id: UserId,
        id: MenuItemId,
        input: &MenuItemInput,
    ) -> Result<MenuItem, RepositoryError> {
        let sql = format!(
            "UPDATE menu_items
             SET name = $1, description = $2, price = $3, category = $4, images = $5,
                 is_combo = $6, sub_items = $7, is_available = $8, updated_at = NOW()
             WHERE id = $9 AND user_id = $10
             RETURNING {ITEM_COLUMNS}"
        );

        let row: Option<MenuItemRow> = sqlx::query_as(&sql)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price.as_minor())
            .bind(&input.category)
            .bind(Json(&input.images))
            .bind(input.is_combo)
            .bind(Json(&input.sub_items))
            .bind(input.is_available)
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(MenuItem::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete an item.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        user_id: UserId,
        id: MenuItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1 AND user_id = $2")
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
