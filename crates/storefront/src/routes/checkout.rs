//! Checkout route handlers.
//!
//! Two paths out of the cart: a prefilled WhatsApp message to the
//! restaurant's number (when the owner holds the add-on), or a manual
//! order captured with the customer's contact details for the owner's
//! dashboard.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use menulane_core::OrderId;

use crate::cart::Cart;
use crate::db::OrderRepository;
use crate::db::menus::PublishedMenu;
use crate::db::orders::{CustomerContact, OrderLine};
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::cart::session_cart;
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub menu: Arc<PublishedMenu>,
    pub cart: Cart,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmed.html")]
pub struct ConfirmedTemplate {
    pub menu: Arc<PublishedMenu>,
    pub order_id: OrderId,
}

/// GET /{username}/checkout
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> Result<Response> {
    let menu = state.published_menu(&username).await?;
    let cart = session_cart(&session, &username).await;

    if cart.is_empty() {
        return Ok(Redirect::to(&format!("/{username}")).into_response());
    }

    Ok(CheckoutTemplate { menu, cart }.into_response())
}

/// POST /{username}/checkout/whatsapp
///
/// Builds the order message server-side and hands the customer to
/// WhatsApp; the cart is kept until the restaurant confirms in chat.
#[instrument(skip(state, session))]
pub async fn whatsapp(
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> Result<Response> {
    let menu = state.published_menu(&username).await?;
    let cart = session_cart(&session, &username).await;

    if cart.is_empty() {
        return Ok(Redirect::to(&format!("/{username}")).into_response());
    }

    let Some(number) = &menu.whatsapp_number else {
        return Err(AppError::BadRequest(
            "This restaurant doesn't take WhatsApp orders".to_owned(),
        ));
    };

    let message = build_whatsapp_message(&menu.brand.name, &cart);
    let number = number.trim_start_matches('+');
    let url = format!("https://wa.me/{number}?text={}", urlencoding::encode(&message));

    Ok(Redirect::to(&url).into_response())
}

/// Manual order form data.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

/// POST /{username}/checkout/order
#[instrument(skip(state, session, form))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Response> {
    let menu = state.published_menu(&username).await?;
    let cart = session_cart(&session, &username).await;

    if cart.is_empty() {
        return Ok(Redirect::to(&format!("/{username}")).into_response());
    }

    let name = form.name.trim();
    let phone = form.phone.trim();
    if name.is_empty() || phone.is_empty() {
        return Err(AppError::BadRequest(
            "Name and phone number are required".to_owned(),
        ));
    }

    let customer = CustomerContact {
        name: name.to_owned(),
        phone: phone.to_owned(),
        address: form.address.map(|a| a.trim().to_owned()).filter(|a| !a.is_empty()),
    };
    let lines: Vec<OrderLine> = cart
        .lines
        .iter()
        .map(|l| OrderLine {
            menu_item_id: l.item_id.as_i32(),
            name: l.name.clone(),
            unit_price: l.unit_price,
            quantity: l.quantity,
            sub_items: l.sub_items.clone(),
        })
        .collect();

    let order_id = OrderRepository::new(state.pool())
        .create(menu.owner_id, &customer, &lines, cart.total())
        .await?;

    session
        .remove::<Cart>(crate::cart::session_keys::CART)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(ConfirmedTemplate { menu, order_id }.into_response())
}

/// Render the cart as a WhatsApp order message.
fn build_whatsapp_message(restaurant: &str, cart: &Cart) -> String {
    use std::fmt::Write;

    let mut message = format!("Hello {restaurant}! I'd like to order:\n\n");
    for line in &cart.lines {
        let _ = write!(message, "{}x {}", line.quantity, line.name);
        if !line.sub_items.is_empty() {
            let subs: Vec<&str> = line.sub_items.iter().map(|s| s.name.as_str()).collect();
            let _ = write!(message, " ({})", subs.join(", "));
        }
        let _ = writeln!(message, " - {}", line.line_total());
    }
    let _ = write!(message, "\nTotal: {}", cart.total());
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::db::menus::SubItem;
    use menulane_core::{MenuItemId, Money};

    #[test]
    fn test_whatsapp_message_format() {
        let mut cart = Cart::new("mamas-kitchen");
        cart.add(CartLine {
            item_id: MenuItemId::new(1),
            name: "Jollof Combo".to_owned(),
            unit_price: Money::from_minor(250_000),
            quantity: 2,
            sub_items: vec![SubItem {
                id: "coke".to_owned(),
                name: "Coke".to_owned(),
                price: Money::from_minor(50_000),
            }],
        });

        let message = build_whatsapp_message("Mama's Kitchen", &cart);
        assert!(message.contains("2x Jollof Combo (Coke)"));
        assert!(message.contains("Total: \u{20a6}6,000.00"));
    }
}
