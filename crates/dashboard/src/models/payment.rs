//! Payment ledger domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use menulane_core::{BillingCycle, Money, PaymentId, UserId};

/// One applied gateway charge.
///
/// The row is keyed by the gateway reference, which is what makes webhook
/// replays and concurrent verify calls safe: a reference that is already in
/// the ledger is never applied a second time.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    /// Gateway reference correlating checkout session, webhook and ledger.
    pub reference: String,
    pub user_id: UserId,
    pub cycle: BillingCycle,
    /// Add-on feature ids purchased with this charge.
    pub features: Vec<String>,
    pub amount: Money,
    pub applied_at: DateTime<Utc>,
}
