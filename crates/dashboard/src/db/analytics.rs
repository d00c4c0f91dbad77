//! Daily order analytics.
//!
//! Rollups are recomputed by re-scanning the orders table on request; there
//! is no incremental aggregation and nothing persisted. Cancelled orders are
//! excluded from revenue.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use menulane_core::{Money, UserId};

use super::RepositoryError;

/// One day's rollup for a restaurant.
#[derive(Debug, Clone, Serialize)]
pub struct DailyAnalytics {
    pub date: NaiveDate,
    pub order_count: i64,
    pub revenue: Money,
}

#[derive(sqlx::FromRow)]
struct DailyRow {
    date: NaiveDate,
    order_count: i64,
    revenue: i64,
}

/// Repository computing per-day order rollups.
pub struct AnalyticsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Daily order counts and revenue for the last `days` days, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn daily_for_user(
        &self,
        user_id: UserId,
        days: i64,
    ) -> Result<Vec<DailyAnalytics>, RepositoryError> {
        let rows: Vec<DailyRow> = sqlx::query_as(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS date,
                    COUNT(*) AS order_count,
                    COALESCE(SUM(total) FILTER (WHERE status <> 'cancelled'), 0) AS revenue
             FROM orders
             WHERE user_id = $1
               AND created_at >= NOW() - ($2 || ' days')::interval
             GROUP BY date
             ORDER BY date DESC",
        )
        .bind(user_id.as_i32())
        .bind(days.to_string())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DailyAnalytics {
                date: r.date,
                order_count: r.order_count,
                revenue: Money::from_minor(r.revenue),
            })
            .collect())
    }
}
