//! Cart behavior tests: merging, totals, and the order snapshot.

use menulane_core::{MenuItemId, Money};

use menulane_storefront::cart::{Cart, CartLine};
use menulane_storefront::db::menus::SubItem;

fn sub(id: &str, name: &str, kobo: i64) -> SubItem {
    SubItem {
        id: id.to_owned(),
        name: name.to_owned(),
        price: Money::from_minor(kobo),
    }
}

fn combo_line(subs: Vec<SubItem>, quantity: u32) -> CartLine {
    CartLine {
        item_id: MenuItemId::new(7),
        name: "Lunch Combo".to_owned(),
        unit_price: Money::from_minor(320_000),
        quantity,
        sub_items: subs,
    }
}

#[test]
fn identical_combos_merge_into_one_line() {
    let mut cart = Cart::new("mamas-kitchen");
    cart.add(combo_line(
        vec![sub("jollof", "Jollof Rice", 200_000), sub("coke", "Coke", 50_000)],
        1,
    ));
    // Same choices, listed in a different order.
    cart.add(combo_line(
        vec![sub("coke", "Coke", 50_000), sub("jollof", "Jollof Rice", 200_000)],
        2,
    ));

    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.lines[0].quantity, 3);
    assert_eq!(cart.item_count(), 3);
}

#[test]
fn differently_customized_combos_stay_separate() {
    let mut cart = Cart::new("mamas-kitchen");
    cart.add(combo_line(vec![sub("jollof", "Jollof Rice", 200_000)], 1));
    cart.add(combo_line(vec![sub("fried", "Fried Rice", 200_000)], 1));

    assert_eq!(cart.lines.len(), 2);
    assert_eq!(cart.item_count(), 2);
}

#[test]
fn combo_unit_total_includes_chosen_sub_items() {
    let line = combo_line(
        vec![sub("jollof", "Jollof Rice", 200_000), sub("coke", "Coke", 50_000)],
        2,
    );
    assert_eq!(line.unit_total(), Money::from_minor(320_000 + 250_000));
    assert_eq!(line.line_total(), Money::from_minor((320_000 + 250_000) * 2));
}

#[test]
fn cart_total_sums_all_lines() {
    let mut cart = Cart::new("mamas-kitchen");
    cart.add(CartLine {
        item_id: MenuItemId::new(1),
        name: "Chapman".to_owned(),
        unit_price: Money::from_minor(80_000),
        quantity: 3,
        sub_items: Vec::new(),
    });
    cart.add(combo_line(vec![sub("coke", "Coke", 50_000)], 1));

    assert_eq!(
        cart.total(),
        Money::from_minor(80_000 * 3 + 320_000 + 50_000)
    );
}

#[test]
fn setting_quantity_to_zero_removes_the_line() {
    let mut cart = Cart::new("mamas-kitchen");
    cart.add(combo_line(Vec::new(), 2));

    cart.set_quantity(0, 0);
    assert!(cart.is_empty());
    assert_eq!(cart.total(), Money::ZERO);
}

#[test]
fn carts_are_scoped_to_one_restaurant() {
    let cart = Cart::new("mamas-kitchen");
    assert_eq!(cart.username, "mamas-kitchen");
    assert!(cart.is_empty());
}
