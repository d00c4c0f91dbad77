//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use menulane_core::subscription::Subscription;
use menulane_core::{Email, UserId, Username};

/// A restaurant owner account.
///
/// Created on signup with a free subscription; the subscription is mutated
/// only by the payment flow and the nightly sweep.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Owner's email address.
    pub email: Email,
    /// Public slug the menu is published under (`/{username}`).
    pub username: Username,
    /// Current subscription state.
    pub subscription: Subscription,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
