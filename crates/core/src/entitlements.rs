//! The static plan/feature catalog and subscription pricing.
//!
//! Features are not persisted anywhere; the catalog is a constant table and
//! the features a user actually holds are stored as a list of feature ids on
//! their subscription. Core features ship with the pro plan; add-ons are
//! purchased on top of it, priced per month in kobo.

use serde::{Deserialize, Serialize};

use crate::types::{BillingCycle, Money, Plan};

/// Pro plan base price per month.
pub const PRO_MONTHLY: Money = Money::from_minor(350_000);

/// Pro plan base price per year (two months free versus paying monthly).
pub const PRO_YEARLY: Money = Money::from_minor(3_500_000);

/// How a feature is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Included with the pro plan at no extra cost.
    Core,
    /// Purchased on top of the pro plan.
    Addon,
}

/// A named entitlement in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    /// Stable identifier stored on subscriptions and in payment metadata.
    pub id: &'static str,
    /// Human-readable name for plan pages and receipts.
    pub name: &'static str,
    pub kind: FeatureKind,
    /// Price per month; zero for core features.
    pub monthly_price: Money,
}

/// The full feature catalog.
pub const FEATURES: &[Feature] = &[
    Feature {
        id: "unlimited-items",
        name: "Unlimited menu items",
        kind: FeatureKind::Core,
        monthly_price: Money::ZERO,
    },
    Feature {
        id: "item-gallery",
        name: "Multiple photos per item",
        kind: FeatureKind::Core,
        monthly_price: Money::ZERO,
    },
    Feature {
        id: "whatsapp-ordering",
        name: "WhatsApp ordering",
        kind: FeatureKind::Addon,
        monthly_price: Money::from_minor(100_000),
    },
    Feature {
        id: "custom-branding",
        name: "Custom colors and logo",
        kind: FeatureKind::Addon,
        monthly_price: Money::from_minor(150_000),
    },
    Feature {
        id: "order-analytics",
        name: "Daily order analytics",
        kind: FeatureKind::Addon,
        monthly_price: Money::from_minor(75_000),
    },
];

/// Look up a feature by its id.
#[must_use]
pub fn feature(id: &str) -> Option<&'static Feature> {
    FEATURES.iter().find(|f| f.id == id)
}

/// Ids of the core features bundled with every pro subscription.
#[must_use]
pub fn core_feature_ids() -> Vec<String> {
    FEATURES
        .iter()
        .filter(|f| f.kind == FeatureKind::Core)
        .map(|f| f.id.to_owned())
        .collect()
}

/// Per-plan content limits enforced by the menu builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    /// Maximum number of menu items; `None` means unlimited.
    pub max_menu_items: Option<usize>,
    /// Maximum number of images per menu item.
    pub max_images_per_item: usize,
}

impl PlanLimits {
    /// The limits for a plan.
    #[must_use]
    pub const fn for_plan(plan: Plan) -> Self {
        match plan {
            Plan::Free => Self {
                max_menu_items: Some(5),
                max_images_per_item: 1,
            },
            Plan::Pro => Self {
                max_menu_items: None,
                max_images_per_item: 5,
            },
        }
    }
}

/// Errors from subscription cost calculation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// A requested add-on id is not in the catalog.
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
    /// A core feature was requested as a paid add-on.
    #[error("feature '{0}' is included with the pro plan and cannot be purchased")]
    NotAnAddon(String),
}

/// Total cost of a pro subscription for one billing period.
///
/// Monthly: `(pro_monthly + Σ addon)`; yearly: `(pro_yearly + Σ addon × 12)`.
/// The discount percentage is clamped to `[0, 100]` and applied to the whole
/// amount, rounding to the nearest kobo.
///
/// # Errors
///
/// Returns [`PricingError`] if an add-on id is unknown or names a core
/// feature.
pub fn calculate_total_subscription_cost(
    cycle: BillingCycle,
    addon_ids: &[String],
    discount_percent: f64,
) -> Result<Money, PricingError> {
    let base = match cycle {
        BillingCycle::Monthly => PRO_MONTHLY,
        BillingCycle::Yearly => PRO_YEARLY,
    };

    let mut addons = Money::ZERO;
    for id in addon_ids {
        let feature = feature(id).ok_or_else(|| PricingError::UnknownFeature(id.clone()))?;
        if feature.kind != FeatureKind::Addon {
            return Err(PricingError::NotAnAddon(id.clone()));
        }
        addons += feature.monthly_price;
    }

    if cycle == BillingCycle::Yearly {
        addons = addons * 12;
    }

    let gross = base + addons;
    let discount = discount_percent.clamp(0.0, 100.0);

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let net = (gross.as_minor() as f64 * (1.0 - discount / 100.0)).round() as i64;

    Ok(Money::from_minor(net))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert!(feature("whatsapp-ordering").is_some());
        assert!(feature("no-such-feature").is_none());
    }

    #[test]
    fn test_core_feature_ids() {
        let ids = core_feature_ids();
        assert!(ids.contains(&"unlimited-items".to_owned()));
        assert!(!ids.contains(&"whatsapp-ordering".to_owned()));
    }

    #[test]
    fn test_plan_limits() {
        let free = PlanLimits::for_plan(Plan::Free);
        assert_eq!(free.max_menu_items, Some(5));
        assert_eq!(free.max_images_per_item, 1);

        let pro = PlanLimits::for_plan(Plan::Pro);
        assert_eq!(pro.max_menu_items, None);
        assert_eq!(pro.max_images_per_item, 5);
    }

    #[test]
    fn test_monthly_cost_no_addons() {
        let cost =
            calculate_total_subscription_cost(BillingCycle::Monthly, &[], 0.0).unwrap();
        assert_eq!(cost, PRO_MONTHLY);
    }

    #[test]
    fn test_yearly_cost_multiplies_addons_by_twelve() {
        let addons = vec!["whatsapp-ordering".to_owned()];
        let cost =
            calculate_total_subscription_cost(BillingCycle::Yearly, &addons, 0.0).unwrap();
        // pro_yearly + 100_000 * 12
        assert_eq!(cost.as_minor(), 3_500_000 + 1_200_000);
    }

    #[test]
    fn test_monthly_cost_with_addons_and_discount() {
        let addons = vec![
            "whatsapp-ordering".to_owned(),
            "custom-branding".to_owned(),
        ];
        // (350_000 + 250_000) * 0.9 = 540_000
        let cost =
            calculate_total_subscription_cost(BillingCycle::Monthly, &addons, 10.0).unwrap();
        assert_eq!(cost.as_minor(), 540_000);
    }

    #[test]
    fn test_discount_rounds_to_nearest_kobo() {
        // 350_000 * (1 - 1/3) = 233_333.33.. rounds to 233_333
        let cost = calculate_total_subscription_cost(
            BillingCycle::Monthly,
            &[],
            100.0 / 3.0,
        )
        .unwrap();
        assert_eq!(cost.as_minor(), 233_333);
    }

    #[test]
    fn test_discount_clamped() {
        let over =
            calculate_total_subscription_cost(BillingCycle::Monthly, &[], 150.0).unwrap();
        assert_eq!(over, Money::ZERO);

        let under =
            calculate_total_subscription_cost(BillingCycle::Monthly, &[], -25.0).unwrap();
        assert_eq!(under, PRO_MONTHLY);
    }

    #[test]
    fn test_unknown_addon_rejected() {
        let err = calculate_total_subscription_cost(
            BillingCycle::Monthly,
            &["jetpack".to_owned()],
            0.0,
        )
        .unwrap_err();
        assert_eq!(err, PricingError::UnknownFeature("jetpack".to_owned()));
    }

    #[test]
    fn test_core_feature_not_purchasable() {
        let err = calculate_total_subscription_cost(
            BillingCycle::Monthly,
            &["unlimited-items".to_owned()],
            0.0,
        )
        .unwrap_err();
        assert_eq!(err, PricingError::NotAnAddon("unlimited-items".to_owned()));
    }
}
