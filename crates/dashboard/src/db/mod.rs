//! Database operations for the dashboard `PostgreSQL` database.
//!
//! # Tables
//!
//! - `users` - Owner accounts with the embedded subscription columns
//! - `sessions` - Tower-sessions storage (shared with the storefront)
//! - `brands` - Per-restaurant branding (1:1 with users)
//! - `menu_items` - Dishes, with jsonb image lists and combo sub-items
//! - `categories` - Menu sections with a manual sort index
//! - `orders` - Customer orders with jsonb line snapshots and a TTL
//! - `payments` - Gateway charge ledger keyed by unique reference
//!
//! # Migrations
//!
//! Migrations are stored in `crates/dashboard/migrations/` and run via:
//! ```bash
//! cargo run -p menulane-cli -- migrate
//! ```
//!
//! Every repository method that touches tenant-owned data takes the owning
//! `UserId` and scopes the query by it; cross-tenant access is not
//! expressible through this module.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod analytics;
pub mod brands;
pub mod categories;
pub mod menu_items;
pub mod orders;
pub mod payments;
pub mod users;

pub use analytics::AnalyticsRepository;
pub use brands::{BrandInput, BrandRepository};
pub use categories::CategoryRepository;
pub use menu_items::{MenuItemInput, MenuItemRepository};
pub use orders::OrderRepository;
pub use payments::PaymentRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The requested row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value failed validation when mapped back to a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation.
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
