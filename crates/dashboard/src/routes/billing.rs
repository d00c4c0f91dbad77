//! Billing route handlers: plan catalog, checkout, callback and webhook.
//!
//! An upgrade can be confirmed by two independent paths: the browser
//! returning through `/billing/callback` (which verifies the charge with
//! the gateway before trusting it) and the `charge.success` webhook. Both
//! funnel into the same idempotent apply, so whichever lands second is a
//! no-op.
//!
//! Webhook responses follow gateway retry semantics strictly: 400 for
//! anything that can never succeed (bad signature, malformed payload) so
//! the gateway stops retrying, 500 for transient failures so it retries,
//! and 200 only once the charge is actually applied (or was already).

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use menulane_core::entitlements::{FEATURES, FeatureKind, PRO_MONTHLY, PRO_YEARLY};
use menulane_core::Money;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::db::{PaymentRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::paystack::verify_webhook_signature;
use crate::services::subscription::{
    ApplyOutcome, ChargeMetadata, UpgradeSelection, apply_successful_charge, start_upgrade,
};
use crate::state::AppState;

/// Header carrying the webhook HMAC.
const SIGNATURE_HEADER: &str = "x-paystack-signature";

/// GET /api/billing/plans
///
/// Public: the pricing page renders before signup.
#[instrument(skip_all)]
pub async fn plans() -> impl IntoResponse {
    let addons: Vec<_> = FEATURES
        .iter()
        .filter(|f| f.kind == FeatureKind::Addon)
        .map(|f| {
            json!({
                "id": f.id,
                "name": f.name,
                "monthly_price": f.monthly_price,
            })
        })
        .collect();

    Json(json!({
        "success": true,
        "pro_monthly": PRO_MONTHLY,
        "pro_yearly": PRO_YEARLY,
        "addons": addons,
    }))
}

/// POST /api/billing/checkout
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(selection): Json<UpgradeSelection>,
) -> Result<impl IntoResponse> {
    let account = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account".to_owned()))?;

    let callback_url = format!("{}/billing/callback", state.config().base_url);
    let initialized = start_upgrade(state.paystack(), &account, &selection, &callback_url)
        .await
        .map_err(|e| match e {
            crate::services::subscription::SubscriptionError::Pricing(err) => {
                AppError::BadRequest(err.to_string())
            }
            crate::services::subscription::SubscriptionError::Paystack(err) => err.into(),
            crate::services::subscription::SubscriptionError::Repository(err) => err.into(),
        })?;

    Ok(Json(json!({
        "success": true,
        "authorization_url": initialized.authorization_url,
        "reference": initialized.reference,
    })))
}

/// Query parameters on the hosted-checkout return URL.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub reference: Option<String>,
    /// Paystack sends both spellings depending on flow.
    pub trxref: Option<String>,
}

/// GET /billing/callback
///
/// The reference is verified against the gateway before anything is
/// granted; query parameters alone prove nothing.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    let Some(reference) = query.reference.or(query.trxref) else {
        return Ok(Redirect::to("/billing?status=missing-reference").into_response());
    };

    let verified = state.paystack().verify_transaction(&reference).await?;
    if !verified.is_successful() {
        info!(reference, status = %verified.status, "charge not successful at callback");
        return Ok(Redirect::to("/billing?status=failed").into_response());
    }

    let metadata: ChargeMetadata = verified
        .metadata
        .ok_or_else(|| AppError::BadRequest("transaction has no metadata".to_owned()))
        .and_then(|m| {
            serde_json::from_value(m)
                .map_err(|e| AppError::BadRequest(format!("unusable transaction metadata: {e}")))
        })?;

    let users = UserRepository::new(state.pool());
    let payments = PaymentRepository::new(state.pool());
    apply_successful_charge(
        &users,
        &payments,
        &metadata,
        &reference,
        Money::from_minor(verified.amount),
    )
    .await?;

    Ok(Redirect::to("/billing?status=success").into_response())
}

/// Body for the client-polled verify endpoint.
#[derive(Debug, Deserialize)]
pub struct VerifyBody {
    pub reference: String,
}

/// POST /api/billing/verify
///
/// Client-polled confirmation for flows where the browser never returns
/// through the callback (closed tab, in-app browser). Applies the same
/// idempotent mutation as the webhook, so polling after the webhook has
/// landed reports `already_applied`.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn verify(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<VerifyBody>,
) -> Result<impl IntoResponse> {
    let verified = state.paystack().verify_transaction(&body.reference).await?;
    if !verified.is_successful() {
        return Ok(Json(json!({
            "success": false,
            "status": verified.status,
        })));
    }

    let metadata: ChargeMetadata = verified
        .metadata
        .ok_or_else(|| AppError::BadRequest("transaction has no metadata".to_owned()))
        .and_then(|m| {
            serde_json::from_value(m)
                .map_err(|e| AppError::BadRequest(format!("unusable transaction metadata: {e}")))
        })?;

    // A charge can only be claimed by the account it was initialized for.
    if metadata.user_id != user.id {
        warn!(reference = %body.reference, "verify attempted against another account's charge");
        return Err(AppError::NotFound("transaction".to_owned()));
    }

    let users = UserRepository::new(state.pool());
    let payments = PaymentRepository::new(state.pool());
    let outcome = apply_successful_charge(
        &users,
        &payments,
        &metadata,
        &body.reference,
        Money::from_minor(verified.amount),
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "outcome": match outcome {
            ApplyOutcome::Applied => "applied",
            ApplyOutcome::AlreadyApplied => "already_applied",
        },
    })))
}

/// GET /api/billing/history
///
/// The account's applied charges, newest first.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let payments = PaymentRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(json!({ "success": true, "payments": payments })))
}

/// Webhook event envelope; only `charge.success` is acted on.
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    event: String,
    data: WebhookCharge,
}

#[derive(Debug, Deserialize)]
struct WebhookCharge {
    reference: String,
    status: String,
    amount: i64,
    metadata: Option<serde_json::Value>,
}

/// POST /api/webhooks/paystack
///
/// Takes the raw body: the signature covers the exact bytes sent, so the
/// payload must not be deserialized before verification.
#[instrument(skip_all)]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let secret = {
        use secrecy::ExposeSecret;
        state.config().paystack.secret_key.expose_secret().to_owned()
    };

    if !verify_webhook_signature(&secret, &body, signature) {
        warn!("webhook signature verification failed");
        return StatusCode::BAD_REQUEST.into_response();
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "malformed webhook payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if event.event != "charge.success" {
        info!(event = %event.event, "ignoring webhook event");
        return StatusCode::OK.into_response();
    }
    if event.data.status != "success" {
        info!(reference = %event.data.reference, "charge.success event without success status");
        return StatusCode::BAD_REQUEST.into_response();
    }

    let metadata: ChargeMetadata = match event
        .data
        .metadata
        .ok_or_else(|| "missing metadata".to_owned())
        .and_then(|m| serde_json::from_value(m).map_err(|e| e.to_string()))
    {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(reference = %event.data.reference, error = %e, "unusable webhook metadata");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let users = UserRepository::new(state.pool());
    let payments = PaymentRepository::new(state.pool());
    let amount = Money::from_minor(event.data.amount);

    match apply_successful_charge(&users, &payments, &metadata, &event.data.reference, amount).await
    {
        Ok(ApplyOutcome::Applied) => {
            notify_activation(&state, &metadata).await;
            StatusCode::OK.into_response()
        }
        Ok(ApplyOutcome::AlreadyApplied) => StatusCode::OK.into_response(),
        Err(e) => {
            error!(reference = %event.data.reference, error = %e, "webhook apply failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Send the activation receipt; failures are logged, never surfaced to
/// the gateway.
async fn notify_activation(state: &AppState, metadata: &ChargeMetadata) {
    let users = UserRepository::new(state.pool());
    let user = match users.get_by_id(metadata.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            warn!(error = %e, "could not load user for activation email");
            return;
        }
    };

    let end_date = user
        .subscription
        .end_date
        .map(|d| d.format("%-d %B %Y").to_string())
        .unwrap_or_default();
    let plan_label = match metadata.cycle {
        menulane_core::BillingCycle::Monthly => "monthly",
        menulane_core::BillingCycle::Yearly => "yearly",
    };

    if let Err(e) = state
        .email()
        .send_subscription_activated(user.email.as_str(), plan_label, &end_date)
        .await
    {
        warn!(error = %e, "failed to send activation email");
    }
}
