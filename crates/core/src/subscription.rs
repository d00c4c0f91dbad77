//! Subscription records, renewal date math and the expiry sweep rules.
//!
//! These are the pure rules the payment flow and the nightly sweep share.
//! The dashboard persists the [`Subscription`] on the user row; the cli's
//! `sweep` command classifies every pro subscription with [`sweep_action`]
//! and applies [`Subscription::downgraded`] where needed.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BillingCycle, Plan, SubscriptionStatus};

/// Days before expiry at which the sweep sends a warning email.
pub const EXPIRY_WARNING_DAYS: i64 = 3;

/// A user's subscription state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub plan: Plan,
    pub status: SubscriptionStatus,
    /// Feature ids the user is entitled to (core + purchased add-ons).
    pub features: Vec<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Subscription {
    /// The subscription every account starts on.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            plan: Plan::Free,
            status: SubscriptionStatus::Active,
            features: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    /// Whether the user holds a feature.
    #[must_use]
    pub fn has_feature(&self, feature_id: &str) -> bool {
        self.status == SubscriptionStatus::Active
            && self.features.iter().any(|f| f == feature_id)
    }

    /// The state after an expiry downgrade.
    ///
    /// Purchased features are dropped along with the plan.
    #[must_use]
    pub const fn downgraded() -> Self {
        Self {
            plan: Plan::Free,
            status: SubscriptionStatus::Cancelled,
            features: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }
}

/// Compute the end date for a newly paid billing period.
///
/// A renewal paid while time remains extends from the existing end date, so
/// renewing early never costs the user their remaining days. Everything else
/// (first purchase, or renewal after lapse) extends from `now`.
#[must_use]
pub fn next_end_date(
    now: DateTime<Utc>,
    existing_end: Option<DateTime<Utc>>,
    cycle: BillingCycle,
) -> DateTime<Utc> {
    let base = match existing_end {
        Some(end) if end > now => end,
        _ => now,
    };

    base.checked_add_months(Months::new(cycle.months()))
        .unwrap_or(base)
}

/// What the nightly sweep should do with a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    /// Nothing to do.
    Keep,
    /// Expiring within [`EXPIRY_WARNING_DAYS`]; send a warning email.
    Warn {
        /// Whole days until expiry (0 = expires today).
        days_left: i64,
    },
    /// End date has passed; downgrade to free.
    Downgrade,
}

/// Classify a subscription for the nightly sweep.
///
/// Only active pro subscriptions are actionable, which is what makes the
/// sweep idempotent: a downgraded record classifies as `Keep` on the next
/// run.
#[must_use]
pub fn sweep_action(subscription: &Subscription, now: DateTime<Utc>) -> SweepAction {
    if subscription.plan != Plan::Pro || subscription.status != SubscriptionStatus::Active {
        return SweepAction::Keep;
    }

    let Some(end) = subscription.end_date else {
        return SweepAction::Keep;
    };

    if end < now {
        return SweepAction::Downgrade;
    }

    let days_left = (end - now).num_days();
    if days_left < EXPIRY_WARNING_DAYS {
        return SweepAction::Warn { days_left };
    }

    SweepAction::Keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn pro(end: Option<DateTime<Utc>>) -> Subscription {
        Subscription {
            plan: Plan::Pro,
            status: SubscriptionStatus::Active,
            features: vec!["unlimited-items".to_owned()],
            start_date: Some(at(2026, 1, 1)),
            end_date: end,
        }
    }

    #[test]
    fn test_first_purchase_extends_from_now() {
        let now = at(2026, 3, 10);
        assert_eq!(
            next_end_date(now, None, BillingCycle::Monthly),
            at(2026, 4, 10)
        );
        assert_eq!(
            next_end_date(now, None, BillingCycle::Yearly),
            at(2027, 3, 10)
        );
    }

    #[test]
    fn test_renewal_with_remaining_days_extends_from_existing_end() {
        let now = at(2026, 3, 10);
        let existing = at(2026, 3, 25);
        assert_eq!(
            next_end_date(now, Some(existing), BillingCycle::Monthly),
            at(2026, 4, 25)
        );
        assert_eq!(
            next_end_date(now, Some(existing), BillingCycle::Yearly),
            at(2027, 3, 25)
        );
    }

    #[test]
    fn test_renewal_after_lapse_extends_from_now() {
        let now = at(2026, 3, 10);
        let lapsed = at(2026, 2, 1);
        assert_eq!(
            next_end_date(now, Some(lapsed), BillingCycle::Monthly),
            at(2026, 4, 10)
        );
    }

    #[test]
    fn test_sweep_downgrades_past_end_date() {
        let now = at(2026, 3, 10);
        let sub = pro(Some(at(2026, 3, 1)));
        assert_eq!(sweep_action(&sub, now), SweepAction::Downgrade);
    }

    #[test]
    fn test_sweep_is_idempotent_after_downgrade() {
        let now = at(2026, 3, 10);
        let mut sub = pro(Some(at(2026, 3, 1)));
        assert_eq!(sweep_action(&sub, now), SweepAction::Downgrade);

        sub = Subscription::downgraded();
        assert_eq!(sub.plan, Plan::Free);
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert_eq!(sub.end_date, None);

        // Second run sees the downgraded record and does nothing.
        assert_eq!(sweep_action(&sub, now), SweepAction::Keep);
    }

    #[test]
    fn test_sweep_warns_inside_window() {
        let now = at(2026, 3, 10);
        let sub = pro(Some(at(2026, 3, 12)));
        assert_eq!(sweep_action(&sub, now), SweepAction::Warn { days_left: 2 });
    }

    #[test]
    fn test_sweep_keeps_outside_window() {
        let now = at(2026, 3, 10);
        let sub = pro(Some(at(2026, 4, 10)));
        assert_eq!(sweep_action(&sub, now), SweepAction::Keep);
    }

    #[test]
    fn test_sweep_ignores_free_plan() {
        let now = at(2026, 3, 10);
        let sub = Subscription::free();
        assert_eq!(sweep_action(&sub, now), SweepAction::Keep);
    }

    #[test]
    fn test_has_feature_requires_active_status() {
        let mut sub = pro(Some(at(2026, 4, 1)));
        assert!(sub.has_feature("unlimited-items"));
        assert!(!sub.has_feature("whatsapp-ordering"));

        sub.status = SubscriptionStatus::Cancelled;
        assert!(!sub.has_feature("unlimited-items"));
    }
}
