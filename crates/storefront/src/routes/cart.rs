//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page
//! reloads. The cart itself lives in the session; prices always come
//! from the published menu, never from the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use menulane_core::MenuItemId;

use crate::cart::{Cart, CartLine, session_keys};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Load the session cart for a restaurant; a cart left over from a
/// different restaurant is discarded.
pub async fn session_cart(session: &Session, username: &str) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .filter(|c| c.username == username)
        .unwrap_or_else(|| Cart::new(username))
}

async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: MenuItemId,
    /// Comma-separated sub-item ids to include (combos only); defaults
    /// to the combo's full set when absent.
    pub sub_items: Option<String>,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line: usize,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line: usize,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub username: String,
    pub cart: Cart,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// POST /{username}/cart/add (HTMX)
///
/// Looks the item up on the published menu and snapshots its current
/// price into the cart line. Identical combos merge into one line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let menu = state.published_menu(&username).await?;

    let item = menu
        .sections
        .iter()
        .flat_map(|s| s.items.iter())
        .find(|i| i.id == form.item_id)
        .ok_or_else(|| AppError::BadRequest("That item is not on this menu".to_owned()))?;

    if !item.is_available {
        return Err(AppError::BadRequest(
            "That item is currently unavailable".to_owned(),
        ));
    }

    let sub_items = match &form.sub_items {
        // A customized combo: keep only the chosen sub-items.
        Some(chosen) => {
            let chosen_ids: Vec<&str> = chosen.split(',').filter(|s| !s.is_empty()).collect();
            item.sub_items
                .iter()
                .filter(|s| chosen_ids.contains(&s.id.as_str()))
                .cloned()
                .collect()
        }
        None => item.sub_items.clone(),
    };

    let mut cart = session_cart(&session, &username).await;
    cart.add(CartLine {
        item_id: item.id,
        name: item.name.clone(),
        unit_price: item.price,
        quantity: form.quantity.unwrap_or(1).max(1),
        sub_items,
    });
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// POST /{username}/cart/update (HTMX)
#[instrument(skip(_state, session))]
pub async fn update(
    State(_state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut cart = session_cart(&session, &username).await;
    cart.set_quantity(form.line, form.quantity);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { username, cart },
    )
        .into_response())
}

/// POST /{username}/cart/remove (HTMX)
#[instrument(skip(_state, session))]
pub async fn remove(
    State(_state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut cart = session_cart(&session, &username).await;
    cart.remove(form.line);
    save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { username, cart },
    )
        .into_response())
}

/// GET /{username}/cart/count (HTMX)
#[instrument(skip(_state, session))]
pub async fn count(
    State(_state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> CartCountTemplate {
    let cart = session_cart(&session, &username).await;
    CartCountTemplate {
        count: cart.item_count(),
    }
}

#[cfg(test)]
mod tests {
    use menulane_core::Money;

    use super::*;
    use crate::db::menus::SubItem;

    fn combo_line() -> CartLine {
        CartLine {
            item_id: MenuItemId::new(7),
            name: "Lunch Combo".to_owned(),
            unit_price: Money::from_minor(320_000),
            quantity: 2,
            sub_items: vec![SubItem {
                id: "chapman".to_owned(),
                name: "Chapman".to_owned(),
                price: Money::from_minor(30_000),
            }],
        }
    }

    #[test]
    fn test_cart_items_fragment_formats_prices() {
        let mut cart = Cart::new("demo");
        cart.add(combo_line());

        let html = CartItemsTemplate {
            username: "demo".to_owned(),
            cart,
        }
        .render()
        .unwrap();

        // line total: 2 x (320,000 + 30,000) kobo
        assert!(html.contains("₦7,000.00"));
        assert!(html.contains("2x Lunch Combo"));
        assert!(html.contains("Chapman"));
    }

    #[test]
    fn test_empty_cart_fragment() {
        let html = CartItemsTemplate {
            username: "demo".to_owned(),
            cart: Cart::new("demo"),
        }
        .render()
        .unwrap();

        assert!(html.contains("Your order is empty."));
    }
}
