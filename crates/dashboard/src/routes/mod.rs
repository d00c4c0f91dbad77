//! HTTP route handlers for the owner dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (pings the database)
//!
//! # Auth
//! POST /api/auth/register          - Create an account, start a session
//! POST /api/auth/login             - Log in
//! POST /api/auth/logout            - Log out
//!
//! # Account (requires auth)
//! GET  /api/account                - Profile with subscription state
//! PUT  /api/account/username       - Change the public menu slug
//!
//! # Menu builder (requires auth)
//! GET    /api/menu/items           - List items
//! POST   /api/menu/items           - Create item (plan cap enforced)
//! PUT    /api/menu/items/{id}      - Update item
//! DELETE /api/menu/items/{id}      - Delete item
//! GET    /api/menu/categories      - List categories in display order
//! POST   /api/menu/categories      - Create category
//! PUT    /api/menu/categories/reorder - Apply a new display order
//! PUT    /api/menu/categories/{id} - Rename category
//! DELETE /api/menu/categories/{id} - Delete category
//! GET    /api/brand                - Get branding
//! PUT    /api/brand                - Create/overwrite branding
//!
//! # Orders (requires auth)
//! GET  /api/orders                 - List orders, newest first
//! GET  /api/orders/{id}            - Order detail
//! PUT  /api/orders/{id}/status     - Advance order status
//! GET  /api/analytics/daily        - Daily order counts and revenue
//!
//! # Billing
//! GET  /api/billing/plans          - Plan and add-on catalog with prices
//! POST /api/billing/checkout       - Start an upgrade (requires auth)
//! POST /api/billing/verify         - Client-polled charge confirmation
//! GET  /api/billing/history        - Applied charges, newest first
//! GET  /billing/callback           - Return URL after hosted checkout
//! POST /api/email/send             - Send a named transactional email
//! POST /api/webhooks/paystack      - Payment gateway webhook
//! ```

pub mod account;
pub mod analytics;
pub mod auth;
pub mod billing;
pub mod brand;
pub mod categories;
pub mod email;
pub mod menu;
pub mod orders;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show))
        .route("/username", put(account::change_username))
}

/// Create the menu builder routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(menu::list_items).post(menu::create_item))
        .route(
            "/items/{id}",
            put(menu::update_item).delete(menu::delete_item),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route("/categories/reorder", put(categories::reorder))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::set_status))
}

/// Create the billing routes router (under /api/billing).
pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(billing::plans))
        .route("/checkout", post(billing::checkout))
        .route("/verify", post(billing::verify))
        .route("/history", get(billing::history))
}

/// Create all routes for the dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/account", account_routes())
        .nest("/api/menu", menu_routes())
        .route("/api/brand", get(brand::show).put(brand::upsert))
        .nest("/api/orders", order_routes())
        .route("/api/analytics/daily", get(analytics::daily))
        .route("/api/email/send", post(email::send))
        .nest("/api/billing", billing_routes())
        .route("/billing/callback", get(billing::callback))
        .route("/api/webhooks/paystack", post(billing::webhook))
}
