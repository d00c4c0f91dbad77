//! Session-backed shopping cart.
//!
//! The cart lives entirely in the session store; nothing touches the
//! database until checkout. Each cart belongs to one restaurant — adding
//! from a different menu starts a fresh cart, matching how a customer at
//! a table orders from one place at a time.
//!
//! Merging: two lines collapse into one when they reference the same
//! item *and* carry the same set of combo sub-items. A combo customized
//! differently (extra drink swapped, say) stays its own line even though
//! the base item matches.

use serde::{Deserialize, Serialize};

use menulane_core::{MenuItemId, Money};

use crate::db::menus::SubItem;

/// One line in the cart: an item (or customized combo) at a quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: MenuItemId,
    pub name: String,
    /// Base unit price at the time of adding.
    pub unit_price: Money,
    pub quantity: u32,
    /// Combo sub-items included in this line; empty for plain items.
    pub sub_items: Vec<SubItem>,
}

impl CartLine {
    /// Price of one unit including its sub-items.
    #[must_use]
    pub fn unit_total(&self) -> Money {
        self.unit_price + self.sub_items.iter().map(|s| s.price).sum()
    }

    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_total() * i64::from(self.quantity)
    }

    /// Whether another line is the same sellable unit: same item and the
    /// same sub-item set, regardless of sub-item order.
    #[must_use]
    pub fn merges_with(&self, other: &Self) -> bool {
        self.item_id == other.item_id && sorted_ids(&self.sub_items) == sorted_ids(&other.sub_items)
    }
}

fn sorted_ids(sub_items: &[SubItem]) -> Vec<&str> {
    let mut ids: Vec<&str> = sub_items.iter().map(|s| s.id.as_str()).collect();
    ids.sort_unstable();
    ids
}

/// A customer's cart for one restaurant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    /// Slug of the restaurant this cart belongs to.
    pub username: String,
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart for a restaurant.
    #[must_use]
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_owned(),
            lines: Vec::new(),
        }
    }

    /// Add a line, merging it into an existing one when it is the same
    /// sellable unit.
    pub fn add(&mut self, line: CartLine) {
        match self.lines.iter_mut().find(|l| l.merges_with(&line)) {
            Some(existing) => existing.quantity += line.quantity,
            None => self.lines.push(line),
        }
    }

    /// Set a line's quantity by position; zero removes the line.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) {
        if quantity == 0 {
            if index < self.lines.len() {
                self.lines.remove(index);
            }
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
    }

    /// Remove a line by position.
    pub fn remove(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cart total.
    #[must_use]
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Session keys used by the storefront.
pub mod session_keys {
    /// The customer's cart (one restaurant at a time).
    pub const CART: &str = "cart";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(id: &str, price: i64) -> SubItem {
        SubItem {
            id: id.to_owned(),
            name: id.to_owned(),
            price: Money::from_minor(price),
        }
    }

    fn line(item_id: i32, subs: Vec<SubItem>) -> CartLine {
        CartLine {
            item_id: MenuItemId::new(item_id),
            name: "Combo".to_owned(),
            unit_price: Money::from_minor(250_000),
            quantity: 1,
            sub_items: subs,
        }
    }

    #[test]
    fn test_same_combo_merges() {
        let mut cart = Cart::new("mamas-kitchen");
        cart.add(line(1, vec![sub("rice", 0), sub("coke", 50_000)]));
        cart.add(line(1, vec![sub("coke", 50_000), sub("rice", 0)]));

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_different_sub_items_stay_separate() {
        let mut cart = Cart::new("mamas-kitchen");
        cart.add(line(1, vec![sub("rice", 0), sub("coke", 50_000)]));
        cart.add(line(1, vec![sub("rice", 0), sub("fanta", 50_000)]));

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_plain_items_merge_by_id() {
        let mut cart = Cart::new("mamas-kitchen");
        cart.add(line(7, Vec::new()));
        cart.add(line(7, Vec::new()));
        cart.add(line(8, Vec::new()));

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_line_total_includes_sub_items() {
        let mut l = line(1, vec![sub("coke", 50_000)]);
        l.quantity = 3;
        // (250_000 + 50_000) * 3
        assert_eq!(l.line_total(), Money::from_minor(900_000));
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new("mamas-kitchen");
        cart.add(line(1, Vec::new()));
        cart.set_quantity(0, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_total() {
        let mut cart = Cart::new("mamas-kitchen");
        cart.add(line(1, Vec::new()));
        cart.add(line(2, vec![sub("coke", 50_000)]));
        // 250_000 + 300_000
        assert_eq!(cart.total(), Money::from_minor(550_000));
    }
}
