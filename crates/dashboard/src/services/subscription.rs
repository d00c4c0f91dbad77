//! Subscription upgrade and renewal flow.
//!
//! An upgrade goes through three steps: `start_upgrade` prices the
//! selection and hands the customer to Paystack's hosted checkout;
//! Paystack later confirms the charge (webhook or callback verify);
//! `apply_successful_charge` then grants the entitlement exactly once,
//! keyed by the payment reference.

use chrono::Utc;
use menulane_core::entitlements::{
    self, FeatureKind, PricingError, calculate_total_subscription_cost,
};
use menulane_core::subscription::{Subscription, next_end_date};
use menulane_core::{BillingCycle, Money, Plan, SubscriptionStatus, UserId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::{PaymentRepository, RepositoryError, UserRepository};
use crate::models::User;
use crate::services::paystack::{InitializedTransaction, PaystackClient, PaystackError};

/// Discount applied to the yearly cycle, in percent.
pub const YEARLY_DISCOUNT_PERCENT: f64 = 0.0;

/// Owner's upgrade selection from the pricing page.
#[derive(Debug, Deserialize)]
pub struct UpgradeSelection {
    pub cycle: BillingCycle,
    #[serde(default)]
    pub addons: Vec<String>,
}

/// Metadata attached to the Paystack transaction so the webhook can
/// reconstruct what was purchased without trusting client input.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChargeMetadata {
    pub user_id: UserId,
    pub cycle: BillingCycle,
    pub features: Vec<String>,
}

/// Errors from the subscription flow.
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Paystack(#[from] PaystackError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Price a selection: base plan for the cycle plus add-ons, yearly
/// add-ons billed for twelve months.
///
/// # Errors
///
/// Returns a pricing error for unknown or non-addon feature ids.
pub fn price_selection(selection: &UpgradeSelection) -> Result<Money, SubscriptionError> {
    let total = calculate_total_subscription_cost(
        selection.cycle,
        &selection.addons,
        YEARLY_DISCOUNT_PERCENT,
    )?;
    Ok(total)
}

/// Feature ids granted by a paid selection: every core Pro feature plus
/// the chosen add-ons.
///
/// # Errors
///
/// Returns `PricingError` if an addon id is unknown or not an add-on.
pub fn granted_features(addons: &[String]) -> Result<Vec<String>, PricingError> {
    let mut features = entitlements::core_feature_ids();
    for id in addons {
        let feature =
            entitlements::feature(id).ok_or_else(|| PricingError::UnknownFeature(id.clone()))?;
        if feature.kind != FeatureKind::Addon {
            return Err(PricingError::NotAnAddon(id.clone()));
        }
        features.push(feature.id.to_owned());
    }
    Ok(features)
}

/// Kick off an upgrade: price the selection, mint a reference, and
/// initialize the hosted checkout.
///
/// # Errors
///
/// Returns an error for invalid selections or Paystack failures.
#[instrument(skip(paystack, user), fields(user_id = %user.id))]
pub async fn start_upgrade(
    paystack: &PaystackClient,
    user: &User,
    selection: &UpgradeSelection,
    callback_url: &str,
) -> Result<InitializedTransaction, SubscriptionError> {
    let amount = price_selection(selection)?;
    let features = granted_features(&selection.addons)?;
    let reference = format!("ml_{}", Uuid::new_v4().simple());

    let metadata = ChargeMetadata {
        user_id: user.id,
        cycle: selection.cycle,
        features,
    };
    let metadata = serde_json::to_value(&metadata)
        .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

    let initialized = paystack
        .initialize_transaction(user.email.as_str(), amount, &reference, callback_url, metadata)
        .await?;

    info!(reference = %initialized.reference, amount = %amount, "upgrade checkout initialized");
    Ok(initialized)
}

/// What applying a confirmed charge did.
#[derive(Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Entitlement granted and the reference recorded in the ledger.
    Applied,
    /// The reference was already in the ledger; nothing changed.
    AlreadyApplied,
}

/// Grant the entitlement for a confirmed charge, exactly once.
///
/// Renewals extend from the current end date when it is still in the
/// future, so paying early never forfeits remaining time.
///
/// # Errors
///
/// Returns a repository error if any write fails; the ledger insert and
/// the subscription update are both retried safely because the ledger
/// check runs first.
#[instrument(skip(users, payments, metadata), fields(user_id = %metadata.user_id))]
pub async fn apply_successful_charge(
    users: &UserRepository<'_>,
    payments: &PaymentRepository<'_>,
    metadata: &ChargeMetadata,
    reference: &str,
    amount: Money,
) -> Result<ApplyOutcome, RepositoryError> {
    if payments.get_by_reference(reference).await?.is_some() {
        info!(reference, "charge already applied, skipping");
        return Ok(ApplyOutcome::AlreadyApplied);
    }

    let user = users
        .get_by_id(metadata.user_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;
    let now = Utc::now();
    let existing_end = match user.subscription.plan {
        Plan::Pro => user.subscription.end_date,
        Plan::Free => None,
    };
    let end_date = next_end_date(now, existing_end, metadata.cycle);

    let subscription = Subscription {
        plan: Plan::Pro,
        status: SubscriptionStatus::Active,
        features: metadata.features.clone(),
        start_date: Some(now),
        end_date: Some(end_date),
    };
    users.set_subscription(metadata.user_id, &subscription).await?;
    payments
        .record(reference, metadata.user_id, metadata.cycle, &metadata.features, amount)
        .await?;

    info!(reference, end_date = %end_date, "subscription activated");
    Ok(ApplyOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_selection_monthly_base() {
        let selection = UpgradeSelection {
            cycle: BillingCycle::Monthly,
            addons: vec![],
        };
        assert_eq!(price_selection(&selection).unwrap(), entitlements::PRO_MONTHLY);
    }

    #[test]
    fn test_price_selection_rejects_unknown_addon() {
        let selection = UpgradeSelection {
            cycle: BillingCycle::Monthly,
            addons: vec!["jetpack".into()],
        };
        assert!(matches!(
            price_selection(&selection),
            Err(SubscriptionError::Pricing(PricingError::UnknownFeature(_)))
        ));
    }

    #[test]
    fn test_granted_features_include_core() {
        let features = granted_features(&["whatsapp-ordering".into()]).unwrap();
        assert!(features.contains(&"unlimited-items".to_string()));
        assert!(features.contains(&"item-gallery".to_string()));
        assert!(features.contains(&"whatsapp-ordering".to_string()));
    }

    #[test]
    fn test_granted_features_reject_core_as_addon() {
        assert!(matches!(
            granted_features(&["unlimited-items".into()]),
            Err(PricingError::NotAnAddon(_))
        ));
    }
}
