//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::MenuRepository;
use crate::db::menus::PublishedMenu;
use crate::error::Result;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Published menus are cached briefly so a
/// lunchtime rush of QR scans doesn't hit the database per request;
/// owners see edits appear within the TTL.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    menu_cache: Cache<String, Arc<PublishedMenu>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let menu_cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(config.menu_cache_seconds))
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                menu_cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Load a published menu, via the cache.
    ///
    /// Only found menus are cached; unknown slugs always hit the
    /// database so a just-registered restaurant appears immediately.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MenuNotFound` for unknown slugs.
    pub async fn published_menu(&self, username: &str) -> Result<Arc<PublishedMenu>> {
        if let Some(menu) = self.inner.menu_cache.get(username).await {
            return Ok(menu);
        }

        let menu = Arc::new(
            MenuRepository::new(self.pool())
                .get_published(username)
                .await?,
        );
        self.inner
            .menu_cache
            .insert(username.to_owned(), Arc::clone(&menu))
            .await;
        Ok(menu)
    }
}
