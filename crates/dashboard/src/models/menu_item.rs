//! Menu item domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use menulane_core::{MenuItemId, Money, UserId};

/// A priced add-on attached to a combo item (e.g. a side dish).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    /// Stable identifier within the parent item, used by cart merging.
    pub id: String,
    pub name: String,
    pub price: Money,
}

/// A dish on the menu.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    /// Owning restaurant; every query is scoped by this.
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    /// Category name, denormalized by design (no FK).
    pub category: Option<String>,
    /// Ordered image URLs; length capped by plan.
    pub images: Vec<String>,
    /// Whether the item carries selectable priced add-ons.
    pub is_combo: bool,
    pub sub_items: Vec<SubItem>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
