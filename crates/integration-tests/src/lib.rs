//! Integration tests for Menulane.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p menulane-integration-tests
//! ```
//!
//! Most tests here exercise the billing, entitlement, and cart logic across
//! crate boundaries without a database; the HTTP smoke tests are `#[ignore]`d
//! and require both servers running against a seeded database:
//!
//! ```bash
//! ml-cli migrate && ml-cli seed -p "a-demo-password"
//! cargo run -p menulane-storefront &
//! cargo run -p menulane-dashboard &
//! cargo test -p menulane-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::{DateTime, Utc};

use menulane_core::subscription::Subscription;
use menulane_core::{Plan, SubscriptionStatus, entitlements};

/// An active pro subscription holding every feature, ending at `end`.
#[must_use]
pub fn active_pro(end: DateTime<Utc>) -> Subscription {
    let mut features = entitlements::core_feature_ids();
    features.push("whatsapp-ordering".to_owned());
    Subscription {
        plan: Plan::Pro,
        status: SubscriptionStatus::Active,
        features,
        start_date: Some(end - chrono::Duration::days(30)),
        end_date: Some(end),
    }
}
