//! Order domain types.
//!
//! Order lines are snapshots of the menu at purchase time: later edits to a
//! menu item never change what an existing order shows or totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use menulane_core::{Money, OrderId, OrderStatus, UserId};

use super::menu_item::SubItem;

/// Contact details the customer leaves with a manual order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
    /// Delivery address or table number, free-form.
    pub address: Option<String>,
}

/// One line of an order: a menu item snapshot with quantity and chosen add-ons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Menu item id at order time (informational; the item may be gone).
    pub menu_item_id: i32,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// Chosen add-ons, snapshotted with their prices.
    pub sub_items: Vec<SubItem>,
}

impl OrderLine {
    /// Price of one unit including chosen add-ons.
    #[must_use]
    pub fn unit_total(&self) -> Money {
        self.unit_price + self.sub_items.iter().map(|s| s.price).sum()
    }

    /// Total for the line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_total() * i64::from(self.quantity)
    }
}

/// A customer order placed against a restaurant's menu.
///
/// Orders are ephemeral: `expires_at` is set five days out at creation and
/// the nightly sweep purges orders past it.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer: CustomerContact,
    pub lines: Vec<OrderLine>,
    pub total: Money,
    pub status: OrderStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// TTL applied to every order at creation.
pub const ORDER_TTL_DAYS: i64 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit: i64, qty: u32, addons: &[i64]) -> OrderLine {
        OrderLine {
            menu_item_id: 1,
            name: "Jollof rice".to_string(),
            unit_price: Money::from_minor(unit),
            quantity: qty,
            sub_items: addons
                .iter()
                .enumerate()
                .map(|(i, p)| SubItem {
                    id: format!("side-{i}"),
                    name: format!("Side {i}"),
                    price: Money::from_minor(*p),
                })
                .collect(),
        }
    }

    #[test]
    fn test_line_total_without_addons() {
        assert_eq!(line(150_000, 3, &[]).line_total().as_minor(), 450_000);
    }

    #[test]
    fn test_line_total_includes_addons_per_unit() {
        // (150_000 + 20_000 + 30_000) * 2
        assert_eq!(
            line(150_000, 2, &[20_000, 30_000]).line_total().as_minor(),
            400_000
        );
    }
}
