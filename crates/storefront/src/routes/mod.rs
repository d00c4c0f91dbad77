//! HTTP route handlers for the public menu site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check
//!
//! # Published menus
//! GET  /{username}                          - Menu page (QR landing)
//! GET  /{username}/manifest.webmanifest     - Per-restaurant web app manifest
//!
//! # Cart (HTMX fragments, session-backed)
//! POST /{username}/cart/add                 - Add item/combo (returns count badge)
//! POST /{username}/cart/update              - Change quantity (returns items fragment)
//! POST /{username}/cart/remove              - Remove line (returns items fragment)
//! GET  /{username}/cart/count               - Count badge fragment
//!
//! # Checkout
//! GET  /{username}/checkout                 - Cart review + contact form
//! POST /{username}/checkout/whatsapp        - Redirect to a prefilled wa.me link
//! POST /{username}/checkout/order           - Place a manual order
//! ```
//!
//! Reserved slugs (`health`, `static`, ...) are rejected at registration,
//! so the static routes never shadow a real menu.

pub mod cart;
pub mod checkout;
pub mod manifest;
pub mod menu;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{username}", get(menu::show))
        .route("/{username}/manifest.webmanifest", get(manifest::webmanifest))
        .route("/{username}/cart/add", post(cart::add))
        .route("/{username}/cart/update", post(cart::update))
        .route("/{username}/cart/remove", post(cart::remove))
        .route("/{username}/cart/count", get(cart::count))
        .route("/{username}/checkout", get(checkout::show))
        .route("/{username}/checkout/whatsapp", post(checkout::whatsapp))
        .route("/{username}/checkout/order", post(checkout::place_order))
}
