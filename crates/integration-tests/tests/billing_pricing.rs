//! Pricing tests across the entitlement catalog and the upgrade flow.

use menulane_core::entitlements::{
    PRO_MONTHLY, PRO_YEARLY, PricingError, calculate_total_subscription_cost, feature,
};
use menulane_core::{BillingCycle, Money};

use menulane_dashboard::services::subscription::{
    UpgradeSelection, YEARLY_DISCOUNT_PERCENT, granted_features, price_selection,
};

fn addons(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|&s| s.to_owned()).collect()
}

// ============================================================================
// Catalog pricing
// ============================================================================

#[test]
fn monthly_base_plan_alone() {
    let total = calculate_total_subscription_cost(BillingCycle::Monthly, &[], 0.0).unwrap();
    assert_eq!(total, PRO_MONTHLY);
}

#[test]
fn monthly_addons_are_billed_once() {
    let total = calculate_total_subscription_cost(
        BillingCycle::Monthly,
        &addons(&["whatsapp-ordering", "order-analytics"]),
        0.0,
    )
    .unwrap();
    assert_eq!(total, PRO_MONTHLY + Money::from_minor(100_000 + 75_000));
}

#[test]
fn yearly_addons_are_billed_for_twelve_months() {
    let total = calculate_total_subscription_cost(
        BillingCycle::Yearly,
        &addons(&["custom-branding"]),
        0.0,
    )
    .unwrap();
    assert_eq!(total, PRO_YEARLY + Money::from_minor(150_000) * 12);
}

#[test]
fn discount_is_clamped_to_valid_range() {
    let over = calculate_total_subscription_cost(BillingCycle::Monthly, &[], 150.0).unwrap();
    assert_eq!(over, Money::ZERO);

    let under = calculate_total_subscription_cost(BillingCycle::Monthly, &[], -25.0).unwrap();
    assert_eq!(under, PRO_MONTHLY);
}

#[test]
fn fifty_percent_discount_halves_the_total() {
    let total = calculate_total_subscription_cost(BillingCycle::Monthly, &[], 50.0).unwrap();
    assert_eq!(total, Money::from_minor(PRO_MONTHLY.as_minor() / 2));
}

#[test]
fn unknown_addon_is_rejected() {
    let err = calculate_total_subscription_cost(
        BillingCycle::Monthly,
        &addons(&["mystery-feature"]),
        0.0,
    )
    .unwrap_err();
    assert!(matches!(err, PricingError::UnknownFeature(id) if id == "mystery-feature"));
}

#[test]
fn core_feature_is_not_purchasable_as_addon() {
    let err = calculate_total_subscription_cost(
        BillingCycle::Monthly,
        &addons(&["unlimited-items"]),
        0.0,
    )
    .unwrap_err();
    assert!(matches!(err, PricingError::NotAnAddon(id) if id == "unlimited-items"));
}

// ============================================================================
// Upgrade flow
// ============================================================================

#[test]
fn price_selection_matches_catalog_math() {
    let selection = UpgradeSelection {
        cycle: BillingCycle::Yearly,
        addons: addons(&["whatsapp-ordering"]),
    };
    let priced = price_selection(&selection).unwrap();
    let expected = calculate_total_subscription_cost(
        BillingCycle::Yearly,
        &selection.addons,
        YEARLY_DISCOUNT_PERCENT,
    )
    .unwrap();
    assert_eq!(priced, expected);
}

#[test]
fn granted_features_include_core_and_purchased_addons() {
    let granted = granted_features(&addons(&["order-analytics"])).unwrap();
    assert!(granted.iter().any(|f| f == "unlimited-items"));
    assert!(granted.iter().any(|f| f == "item-gallery"));
    assert!(granted.iter().any(|f| f == "order-analytics"));
    assert!(!granted.iter().any(|f| f == "whatsapp-ordering"));
}

#[test]
fn granted_features_reject_unknown_addons() {
    assert!(granted_features(&addons(&["mystery-feature"])).is_err());
}

#[test]
fn catalog_prices_are_positive() {
    for id in ["whatsapp-ordering", "custom-branding", "order-analytics"] {
        let f = feature(id).unwrap();
        assert!(f.monthly_price > Money::ZERO, "{id} should have a price");
    }
}
