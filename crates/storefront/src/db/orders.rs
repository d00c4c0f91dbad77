//! Manual order writes.
//!
//! The storefront inserts orders exactly as the dashboard reads them:
//! the customer contact and line snapshots as JSONB, the total computed
//! server-side, and a TTL after which the nightly sweep purges the row.

use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use sqlx::types::Json;

use menulane_core::{Money, OrderId, UserId};

use super::menus::SubItem;
use crate::error::Result;

/// How long an order row lives before the sweep purges it.
pub const ORDER_TTL_DAYS: i64 = 5;

/// Customer contact captured with a manual order.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

/// A priced line snapshot stored on the order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub menu_item_id: i32,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub sub_items: Vec<SubItem>,
}

/// Repository for customer order writes.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a pending order and return its id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        customer: &CustomerContact,
        lines: &[OrderLine],
        total: Money,
    ) -> Result<OrderId> {
        let expires_at = Utc::now() + Duration::days(ORDER_TTL_DAYS);

        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO orders (user_id, customer, lines, total, status, expires_at)
             VALUES ($1, $2, $3, $4, 'pending', $5)
             RETURNING id",
        )
        .bind(user_id.as_i32())
        .bind(Json(customer))
        .bind(Json(lines))
        .bind(total.as_minor())
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(OrderId::new(id))
    }
}
