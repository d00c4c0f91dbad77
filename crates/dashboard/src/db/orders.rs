//! Order repository for database operations.
//!
//! Orders are written by the public storefront and managed (status updates)
//! from the dashboard. Every order carries a TTL; the nightly sweep deletes
//! orders past their `expires_at`.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use menulane_core::{Money, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::order::{CustomerContact, ORDER_TTL_DAYS, Order, OrderLine};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    customer: Json<CustomerContact>,
    lines: Json<Vec<OrderLine>>,
    total: i64,
    status: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let status = OrderStatus::from_str(&self.status)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid order status: {e}")))?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            customer: self.customer.0,
            lines: self.lines.0,
            total: Money::from_minor(self.total),
            status,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const ORDER_COLUMNS: &str =
    "id, user_id, customer, lines, total, status, expires_at, created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending order with the standard TTL.
    ///
    /// The total is computed from the line snapshots, never trusted from the
    /// client.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        customer: &CustomerContact,
        lines: &[OrderLine],
    ) -> Result<Order, RepositoryError> {
        let total: Money = lines.iter().map(OrderLine::line_total).sum();
        let expires_at = Utc::now() + Duration::days(ORDER_TTL_DAYS);

        let sql = format!(
            "INSERT INTO orders (user_id, customer, lines, total, status, expires_at)
             VALUES ($1, $2, $3, $4, 'pending', $5)
             RETURNING {ORDER_COLUMNS}"
        );

        let row: OrderRow = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .bind(Json(customer))
            .bind(Json(lines))
            .bind(total.as_minor())
            .bind(expires_at)
            .fetch_one(self.pool)
            .await?;

        row.into_order()
    }

    /// All orders for a restaurant, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        );

        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Get one order, scoped by owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        );

        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Set an order's status.
    ///
    /// Transition validity is checked by the caller against
    /// `OrderStatus::can_transition_to`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist for the
    /// user.
    pub async fn set_status(
        &self,
        user_id: UserId,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let sql = format!(
            "UPDATE orders SET status = $1, updated_at = NOW()
             WHERE id = $2 AND user_id = $3
             RETURNING {ORDER_COLUMNS}"
        );

        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(status.to_string())
            .bind(id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.ok_or(RepositoryError::NotFound)?.into_order()
    }

    /// Delete all orders past their TTL, across all users.
    ///
    /// Used by the nightly sweep.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE expires_at < $1")
            .bind(now)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
