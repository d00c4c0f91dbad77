//! User repository for database operations.
//!
//! The subscription is embedded in the user row (plan, status, features,
//! start/end dates) so reading a user always yields their entitlements in
//! one query.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use menulane_core::subscription::Subscription;
use menulane_core::{Email, Plan, SubscriptionStatus, UserId, Username};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::User;

/// Database row for a user; mapped into the domain type with validation.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    username: String,
    plan: String,
    subscription_status: String,
    features: Vec<String>,
    subscription_start: Option<DateTime<Utc>>,
    subscription_end: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let plan = Plan::from_str(&self.plan)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid plan: {e}")))?;
        let status = SubscriptionStatus::from_str(&self.subscription_status).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid subscription status: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            email,
            username,
            subscription: Subscription {
                plan,
                status,
                features: self.features,
                start_date: self.subscription_start,
                end_date: self.subscription_end,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const USER_COLUMNS: &str = "id, email, username, plan, subscription_status, features, \
     subscription_start, subscription_end, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new owner account with a free subscription.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or username is taken.
    pub async fn create(
        &self,
        email: &Email,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (email, username, password_hash, plan, subscription_status, features)
             VALUES ($1, $2, $3, 'free', 'active', '{{}}')
             RETURNING {USER_COLUMNS}"
        );

        let row: UserRow = sqlx::query_as(&sql)
            .bind(email.as_str())
            .bind(username.as_str())
            .bind(password_hash)
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "email or username"))?;

        row.into_user()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored fields are invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their public menu slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(username.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user's password hash by email, for login.
    ///
    /// Returns `None` if no account exists for the email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        );

        #[derive(sqlx::FromRow)]
        struct WithHash {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row: Option<WithHash> = sqlx::query_as(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some((r.user.into_user()?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Change the public menu slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken and
    /// `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_username(
        &self,
        id: UserId,
        username: &Username,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET username = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(username.as_str())
        .bind(id.as_i32())
        .execute(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Overwrite the subscription columns on the user row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_subscription(
        &self,
        id: UserId,
        subscription: &Subscription,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users
             SET plan = $1,
                 subscription_status = $2,
                 features = $3,
                 subscription_start = $4,
                 subscription_end = $5,
                 updated_at = NOW()
             WHERE id = $6",
        )
        .bind(subscription.plan.to_string())
        .bind(subscription.status.to_string())
        .bind(&subscription.features)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// All users with an active pro subscription, for the nightly sweep.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_pro(&self) -> Result<Vec<User>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE plan = 'pro' AND subscription_status = 'active'
             ORDER BY id"
        );

        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        rows.into_iter().map(UserRow::into_user).collect()
    }
}
