//! Subscription lifecycle tests: purchase, renewal, warning, and expiry.
//!
//! These cover the billing-period arithmetic and the nightly sweep
//! classification end to end, without a database.

use chrono::{Duration, TimeZone, Utc};

use menulane_core::BillingCycle;
use menulane_core::subscription::{
    EXPIRY_WARNING_DAYS, Subscription, SweepAction, next_end_date, sweep_action,
};

use menulane_integration_tests::active_pro;

// ============================================================================
// Renewal arithmetic
// ============================================================================

#[test]
fn first_purchase_extends_from_now() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let end = next_end_date(now, None, BillingCycle::Monthly);
    assert_eq!(end, Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap());
}

#[test]
fn early_renewal_keeps_remaining_days() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let existing = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap();

    let end = next_end_date(now, Some(existing), BillingCycle::Monthly);
    assert_eq!(end, Utc.with_ymd_and_hms(2026, 4, 20, 12, 0, 0).unwrap());
}

#[test]
fn lapsed_renewal_extends_from_now() {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let lapsed = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();

    let end = next_end_date(now, Some(lapsed), BillingCycle::Yearly);
    assert_eq!(end, Utc.with_ymd_and_hms(2027, 3, 1, 12, 0, 0).unwrap());
}

#[test]
fn yearly_cycle_adds_twelve_months() {
    let now = Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap();
    let end = next_end_date(now, None, BillingCycle::Yearly);
    assert_eq!(end, Utc.with_ymd_and_hms(2027, 2, 28, 0, 0, 0).unwrap());
}

// ============================================================================
// Sweep classification
// ============================================================================

#[test]
fn healthy_subscription_is_kept() {
    let now = Utc::now();
    let sub = active_pro(now + Duration::days(20));
    assert_eq!(sweep_action(&sub, now), SweepAction::Keep);
}

#[test]
fn subscription_near_expiry_gets_a_warning() {
    let now = Utc::now();
    let sub = active_pro(now + Duration::days(EXPIRY_WARNING_DAYS - 1));
    assert_eq!(
        sweep_action(&sub, now),
        SweepAction::Warn {
            days_left: EXPIRY_WARNING_DAYS - 1
        }
    );
}

#[test]
fn lapsed_subscription_is_downgraded() {
    let now = Utc::now();
    let sub = active_pro(now - Duration::hours(1));
    assert_eq!(sweep_action(&sub, now), SweepAction::Downgrade);
}

#[test]
fn downgrade_is_idempotent() {
    let now = Utc::now();
    let sub = active_pro(now - Duration::days(2));
    assert_eq!(sweep_action(&sub, now), SweepAction::Downgrade);

    // A second sweep sees the already-downgraded record and leaves it alone.
    let after = Subscription::downgraded();
    assert_eq!(sweep_action(&after, now), SweepAction::Keep);
    assert_eq!(sweep_action(&after, now + Duration::days(30)), SweepAction::Keep);
}

#[test]
fn downgrade_drops_purchased_features() {
    let now = Utc::now();
    let sub = active_pro(now + Duration::days(10));
    assert!(sub.has_feature("whatsapp-ordering"));

    let after = Subscription::downgraded();
    assert!(!after.has_feature("whatsapp-ordering"));
    assert!(!after.has_feature("unlimited-items"));
}

#[test]
fn free_plan_is_never_swept() {
    let now = Utc::now();
    assert_eq!(sweep_action(&Subscription::free(), now), SweepAction::Keep);
}
