//! Transactional email route handler.
//!
//! Sends one of the named email templates to the authenticated owner (or
//! an explicit recipient). Mostly exercised by dashboard flows that want
//! to resend something - the automatic sends (welcome, receipts, expiry)
//! fire from their own code paths.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Body for the email send endpoint.
#[derive(Debug, Deserialize)]
pub struct SendEmailBody {
    /// Recipient override; defaults to the authenticated owner's address.
    pub to: Option<String>,
    /// Template name: `welcome`, `subscription-activated`,
    /// `expiry-warning`, or `subscription-expired`.
    pub template: String,
    /// Template-specific substitution values.
    #[serde(default)]
    pub variables: serde_json::Map<String, serde_json::Value>,
}

fn string_var<'a>(
    variables: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<&'a str> {
    variables
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::BadRequest(format!("missing template variable: {key}")))
}

/// POST /api/email/send
#[instrument(skip_all, fields(user_id = %user.id, template = %body.template))]
pub async fn send(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<SendEmailBody>,
) -> Result<impl IntoResponse> {
    let to = body.to.as_deref().unwrap_or_else(|| user.email.as_str());
    let email = state.email();

    match body.template.as_str() {
        "welcome" => {
            let account = UserRepository::new(state.pool())
                .get_by_id(user.id)
                .await?
                .ok_or_else(|| AppError::NotFound("account".to_owned()))?;
            let menu_url = format!(
                "{}/{}",
                state.config().storefront_base_url,
                account.username.as_str()
            );
            email
                .send_welcome(to, account.username.as_str(), &menu_url)
                .await?;
        }
        "subscription-activated" => {
            let plan_label = string_var(&body.variables, "plan_label")?;
            let end_date = string_var(&body.variables, "end_date")?;
            email
                .send_subscription_activated(to, plan_label, end_date)
                .await?;
        }
        "expiry-warning" => {
            let days_left = body
                .variables
                .get("days_left")
                .and_then(serde_json::Value::as_i64)
                .ok_or_else(|| {
                    AppError::BadRequest("missing template variable: days_left".to_owned())
                })?;
            email.send_expiry_warning(to, days_left).await?;
        }
        "subscription-expired" => {
            email.send_subscription_expired(to).await?;
        }
        other => {
            return Err(AppError::BadRequest(format!("unknown template: {other}")));
        }
    }

    Ok(Json(json!({ "success": true })))
}
