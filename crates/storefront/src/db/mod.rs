//! Database access layer for the storefront.
//!
//! The storefront only reads the menu tables the dashboard writes, and
//! only writes customer orders. All queries are scoped by the owning
//! user so one restaurant can never see another's data.

pub mod menus;
pub mod orders;

pub use menus::MenuRepository;
pub use orders::OrderRepository;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a database connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection fails.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    use secrecy::ExposeSecret;

    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
