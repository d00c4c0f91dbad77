//! Account route handlers.

use axum::{Json, extract::State, response::IntoResponse};
use menulane_core::Username;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// GET /api/account
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let users = UserRepository::new(state.pool());
    let account = users
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account".to_owned()))?;

    Ok(Json(json!({ "success": true, "user": account })))
}

/// Username change request body.
#[derive(Debug, Deserialize)]
pub struct ChangeUsernameBody {
    pub username: String,
}

/// PUT /api/account/username
///
/// Changes the public menu slug. The old slug is released immediately;
/// printed QR codes pointing at it stop working, which the dashboard UI
/// warns about before submitting.
#[instrument(skip_all, fields(user_id = %user.id, username = %body.username))]
pub async fn change_username(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ChangeUsernameBody>,
) -> Result<impl IntoResponse> {
    let username =
        Username::parse(&body.username).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let users = UserRepository::new(state.pool());
    if let Some(existing) = users.get_by_username(&username).await?
        && existing.id != user.id
    {
        return Err(AuthError::UsernameTaken.into());
    }

    users.set_username(user.id, &username).await?;

    Ok(Json(json!({ "success": true, "username": username })))
}
