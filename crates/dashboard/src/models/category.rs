//! Category domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use menulane_core::{CategoryId, UserId};

/// A menu section, manually ordered by the owner.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    /// Manual sort index; lower values render first.
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
