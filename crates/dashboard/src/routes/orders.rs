//! Order route handlers.
//!
//! Status moves one step forward at a time (pending → confirmed →
//! preparing → ready → completed), with cancellation allowed from any
//! non-terminal state. Invalid jumps are rejected before touching the
//! database.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use menulane_core::{OrderId, OrderStatus};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Status change request body.
#[derive(Debug, Deserialize)]
pub struct SetStatusBody {
    pub status: OrderStatus,
}

/// GET /api/orders
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// GET /api/orders/{id}
#[instrument(skip_all, fields(user_id = %user.id, order_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool())
        .get(user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(json!({ "success": true, "order": order })))
}

/// PUT /api/orders/{id}/status
#[instrument(skip_all, fields(user_id = %user.id, order_id = %id))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
    Json(body): Json<SetStatusBody>,
) -> Result<impl IntoResponse> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get(user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !order.status.can_transition_to(body.status) {
        return Err(AppError::BadRequest(format!(
            "Cannot move an order from '{}' to '{}'",
            order.status, body.status
        )));
    }

    let order = repo.set_status(user.id, id, body.status).await?;

    Ok(Json(json!({ "success": true, "order": order })))
}
