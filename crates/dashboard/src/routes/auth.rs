//! Authentication route handlers.
//!
//! Registration creates the account with a free subscription and logs the
//! owner straight in; the welcome email is sent best-effort so a broken
//! SMTP relay never blocks signup.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use menulane_core::{Email, Username};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{self, AuthError};
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
#[instrument(skip_all, fields(email = %body.email, username = %body.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&body.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let username =
        Username::parse(&body.username).map_err(|e| AppError::BadRequest(e.to_string()))?;
    auth::validate_password(&body.password)?;

    let password_hash = auth::hash_password(&body.password)?;

    let users = UserRepository::new(state.pool());
    if users.get_by_email(&email).await?.is_some() {
        return Err(AuthError::EmailTaken.into());
    }
    if users.get_by_username(&username).await?.is_some() {
        return Err(AuthError::UsernameTaken.into());
    }

    let user = users.create(&email, &username, &password_hash).await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    // Best-effort; registration must not fail on SMTP trouble.
    let menu_url = format!(
        "{}/{}",
        state.config().storefront_base_url,
        user.username.as_str()
    );
    if let Err(e) = state
        .email()
        .send_welcome(user.email.as_str(), user.username.as_str(), &menu_url)
        .await
    {
        warn!(error = %e, "failed to send welcome email");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "user": user })),
    ))
}

/// POST /api/auth/login
#[instrument(skip_all, fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&body.email).map_err(|_| AuthError::InvalidCredentials)?;

    let users = UserRepository::new(state.pool());
    let (user, stored_hash) = users
        .get_password_hash(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    auth::verify_password(&body.password, &stored_hash)?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true, "user": user })))
}

/// POST /api/auth/logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}
