//! Category route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use menulane_core::CategoryId;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Category request body (create and update).
#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Reorder request body: all category ids in the desired display order.
#[derive(Debug, Deserialize)]
pub struct ReorderBody {
    pub ordered_ids: Vec<CategoryId>,
}

/// GET /api/menu/categories
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(json!({ "success": true, "categories": categories })))
}

/// POST /api/menu/categories
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CategoryBody>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Category name is required".to_owned()));
    }

    let category = CategoryRepository::new(state.pool())
        .create(user.id, name, body.description.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "category": category })),
    ))
}

/// PUT /api/menu/categories/{id}
#[instrument(skip_all, fields(user_id = %user.id, category_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CategoryId>,
    Json(body): Json<CategoryBody>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Category name is required".to_owned()));
    }

    let category = CategoryRepository::new(state.pool())
        .update(user.id, id, name, body.description.as_deref())
        .await?;

    Ok(Json(json!({ "success": true, "category": category })))
}

/// PUT /api/menu/categories/reorder
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn reorder(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ReorderBody>,
) -> Result<impl IntoResponse> {
    let repo = CategoryRepository::new(state.pool());
    repo.reorder(user.id, &body.ordered_ids).await?;
    let categories = repo.list_for_user(user.id).await?;

    Ok(Json(json!({ "success": true, "categories": categories })))
}

/// DELETE /api/menu/categories/{id}
///
/// Items keep their category label; the storefront groups unknown labels
/// under "Other".
#[instrument(skip_all, fields(user_id = %user.id, category_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<CategoryId>,
) -> Result<impl IntoResponse> {
    let deleted = CategoryRepository::new(state.pool())
        .delete(user.id, id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!("category {id}")));
    }

    Ok(Json(json!({ "success": true })))
}
