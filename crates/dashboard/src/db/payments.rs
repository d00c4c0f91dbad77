//! Payment ledger repository.
//!
//! Rows are keyed by the unique gateway reference. The entitlement flow
//! checks for an existing row before applying a charge, so webhook replays
//! and a concurrent client-side verify can never extend a subscription
//! twice.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use menulane_core::{BillingCycle, Money, PaymentId, UserId};

use super::{RepositoryError, map_unique_violation};
use crate::models::payment::PaymentRecord;

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i32,
    reference: String,
    user_id: i32,
    cycle: String,
    features: Vec<String>,
    amount: i64,
    applied_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_record(self) -> Result<PaymentRecord, RepositoryError> {
        let cycle = BillingCycle::from_str(&self.cycle)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid billing cycle: {e}")))?;

        Ok(PaymentRecord {
            id: PaymentId::new(self.id),
            reference: self.reference,
            user_id: UserId::new(self.user_id),
            cycle,
            features: self.features,
            amount: Money::from_minor(self.amount),
            applied_at: self.applied_at,
        })
    }
}

const PAYMENT_COLUMNS: &str = "id, reference, user_id, cycle, features, amount, applied_at";

/// Repository for the payment ledger.
pub struct PaymentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a ledger entry by gateway reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE reference = $1");
        let row: Option<PaymentRow> = sqlx::query_as(&sql)
            .bind(reference)
            .fetch_optional(self.pool)
            .await?;

        row.map(PaymentRow::into_record).transpose()
    }

    /// Record an applied charge.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the reference is already in
    /// the ledger.
    pub async fn record(
        &self,
        reference: &str,
        user_id: UserId,
        cycle: BillingCycle,
        features: &[String],
        amount: Money,
    ) -> Result<PaymentRecord, RepositoryError> {
        let sql = format!(
            "INSERT INTO payments (reference, user_id, cycle, features, amount)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PAYMENT_COLUMNS}"
        );

        let row: PaymentRow = sqlx::query_as(&sql)
            .bind(reference)
            .bind(user_id.as_i32())
            .bind(cycle.to_string())
            .bind(features)
            .bind(amount.as_minor())
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "payment reference"))?;

        row.into_record()
    }

    /// All payments for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PaymentRecord>, RepositoryError> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = $1 ORDER BY applied_at DESC"
        );

        let rows: Vec<PaymentRow> = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(PaymentRow::into_record).collect()
    }
}
