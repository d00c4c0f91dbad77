//! Brand repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use menulane_core::{BrandId, UserId};

use super::RepositoryError;
use crate::models::brand::Brand;

/// Fields for creating or updating a brand.
#[derive(Debug, Clone)]
pub struct BrandInput {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub accent_color: String,
    pub whatsapp_number: Option<String>,
}

#[derive(sqlx::FromRow)]
struct BrandRow {
    id: i32,
    user_id: i32,
    name: String,
    description: Option<String>,
    logo_url: Option<String>,
    primary_color: String,
    accent_color: String,
    whatsapp_number: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Self {
            id: BrandId::new(row.id),
            user_id: UserId::new(row.user_id),
            name: row.name,
            description: row.description,
            logo_url: row.logo_url,
            primary_color: row.primary_color,
            accent_color: row.accent_color,
            whatsapp_number: row.whatsapp_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const BRAND_COLUMNS: &str = "id, user_id, name, description, logo_url, primary_color, \
     accent_color, whatsapp_number, created_at, updated_at";

/// Repository for brand database operations.
pub struct BrandRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BrandRepository<'a> {
    /// Create a new brand repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's brand, if they have customized one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(&self, user_id: UserId) -> Result<Option<Brand>, RepositoryError> {
        let sql = format!("SELECT {BRAND_COLUMNS} FROM brands WHERE user_id = $1");
        let row: Option<BrandRow> = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Brand::from))
    }

    /// Create or overwrite the user's brand (1:1 upsert keyed on `user_id`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        input: &BrandInput,
    ) -> Result<Brand, RepositoryError> {
        let sql = format!(
            "INSERT INTO brands
                 (user_id, name, description, logo_url, primary_color, accent_color, whatsapp_number)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id) DO UPDATE
             SET name = EXCLUDED.name,
                 description = EXCLUDED.description,
                 logo_url = EXCLUDED.logo_url,
                 primary_color = EXCLUDED.primary_color,
                 accent_color = EXCLUDED.accent_color,
                 whatsapp_number = EXCLUDED.whatsapp_number,
                 updated_at = NOW()
             RETURNING {BRAND_COLUMNS}"
        );

        let row: BrandRow = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.logo_url)
            .bind(&input.primary_color)
            .bind(&input.accent_color)
            .bind(&input.whatsapp_number)
            .fetch_one(self.pool)
            .await?;

        Ok(row.into())
    }
}
