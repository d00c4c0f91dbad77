//! Nightly subscription sweep.
//!
//! Walks every active Pro subscription and, based on its end date:
//!
//! - sends an expiry warning when the end date is a few days out
//! - downgrades the account to the free plan once the end date has passed,
//!   then emails the owner
//!
//! Finally purges customer orders past their retention window. Downgrading
//! only rewrites the subscription columns; menu items over the free cap are
//! kept but the cap stops new ones, and gated features simply stop
//! rendering. Running the sweep twice in a row is safe: a downgraded
//! account no longer matches the active-Pro query.
//!
//! # Usage
//!
//! ```bash
//! # Intended to run from cron, shortly after midnight
//! ml-cli sweep
//!
//! # Report without writing
//! ml-cli sweep --dry-run
//! ```
//!
//! # Environment Variables
//!
//! Uses the full dashboard configuration (database, SMTP, base URLs); see
//! `DashboardConfig`.

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use menulane_core::subscription::{self, Subscription, SweepAction};

use menulane_dashboard::config::{ConfigError, DashboardConfig};
use menulane_dashboard::db::{self, OrderRepository, RepositoryError, UserRepository};
use menulane_dashboard::services::email::{EmailError, EmailService};

/// Errors that can occur during the sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Email transport could not be built.
    #[error("Email error: {0}")]
    Email(#[from] EmailError),
}

/// What the sweep did (or would have done, under `--dry-run`).
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Expiry warnings sent.
    pub warned: u32,
    /// Accounts downgraded to the free plan.
    pub downgraded: u32,
    /// Downgrades that failed and will be retried on the next run.
    pub failed: u32,
    /// Expired customer orders deleted.
    pub purged_orders: u64,
}

/// Fold one downgrade attempt into the report.
fn tally_downgrade(report: &mut SweepReport, result: &Result<(), RepositoryError>) {
    match result {
        Ok(()) => report.downgraded += 1,
        Err(_) => report.failed += 1,
    }
}

/// Run the sweep once.
///
/// One user's failure is logged and counted but never stalls the rest of
/// the batch: a bad address skips the email, a failed downgrade write
/// leaves the account for the next run. Only configuration, connecting,
/// listing, and the final purge abort the sweep.
///
/// # Errors
///
/// Returns `SweepError` if configuration, the database connection, the
/// active-Pro listing, or the order purge fails.
pub async fn run(dry_run: bool) -> Result<SweepReport, SweepError> {
    let config = DashboardConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let email = EmailService::new(&config.email, &config.base_url).map_err(EmailError::from)?;

    let users = UserRepository::new(&pool);
    let now = Utc::now();
    let mut report = SweepReport::default();

    for user in users.list_active_pro().await? {
        match subscription::sweep_action(&user.subscription, now) {
            SweepAction::Keep => {}
            SweepAction::Warn { days_left } => {
                report.warned += 1;
                info!(user_id = %user.id, days_left, dry_run, "Subscription expiring soon");
                if !dry_run
                    && let Err(e) = email.send_expiry_warning(user.email.as_str(), days_left).await
                {
                    warn!(user_id = %user.id, error = %e, "Failed to send expiry warning");
                }
            }
            SweepAction::Downgrade => {
                info!(user_id = %user.id, dry_run, "Subscription expired; downgrading");
                if dry_run {
                    report.downgraded += 1;
                    continue;
                }
                let result = users
                    .set_subscription(user.id, &Subscription::downgraded())
                    .await;
                if let Err(e) = &result {
                    warn!(user_id = %user.id, error = %e, "Failed to downgrade; left for next run");
                }
                tally_downgrade(&mut report, &result);
                if result.is_ok()
                    && let Err(e) = email.send_subscription_expired(user.email.as_str()).await
                {
                    warn!(user_id = %user.id, error = %e, "Failed to send expiry notice");
                }
            }
        }
    }

    if !dry_run {
        report.purged_orders = OrderRepository::new(&pool).purge_expired(now).await?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_downgrade_is_counted_and_later_users_still_tallied() {
        let mut report = SweepReport::default();

        tally_downgrade(&mut report, &Ok(()));
        tally_downgrade(&mut report, &Err(RepositoryError::NotFound));
        tally_downgrade(&mut report, &Ok(()));

        assert_eq!(report.downgraded, 2);
        assert_eq!(report.failed, 1);
    }
}
