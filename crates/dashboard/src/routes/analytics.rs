//! Analytics route handlers.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::{AnalyticsRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Largest window the daily query will aggregate.
const MAX_WINDOW_DAYS: i64 = 90;

/// Query parameters for the daily analytics window.
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// How many days back to aggregate (default 30, capped at 90).
    #[serde(default = "default_days")]
    pub days: i64,
}

const fn default_days() -> i64 {
    30
}

/// Clamp a requested window to something the rollup query will accept.
fn window_days(requested: i64) -> i64 {
    requested.clamp(1, MAX_WINDOW_DAYS)
}

/// GET /api/analytics/daily
///
/// Requires the `order-analytics` add-on.
#[instrument(skip_all, fields(user_id = %user.id, days = query.days))]
pub async fn daily(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<DailyQuery>,
) -> Result<impl IntoResponse> {
    let account = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account".to_owned()))?;

    if !account.subscription.has_feature("order-analytics") {
        return Err(AppError::PlanLimit(
            "Order analytics requires the analytics add-on".to_owned(),
        ));
    }

    let days = window_days(query.days);
    let daily = AnalyticsRepository::new(state.pool())
        .daily_for_user(user.id, days)
        .await?;

    Ok(Json(json!({ "success": true, "days": days, "daily": daily })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults_to_thirty_days() {
        let query: DailyQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(window_days(query.days), 30);
    }

    #[test]
    fn test_window_is_clamped() {
        assert_eq!(window_days(0), 1);
        assert_eq!(window_days(-7), 1);
        assert_eq!(window_days(365), MAX_WINDOW_DAYS);
    }
}
