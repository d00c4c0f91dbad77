//! Menu page route handler.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::menus::PublishedMenu;
use crate::error::Result;
use crate::filters;
use crate::routes::cart::session_cart;
use crate::state::AppState;

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/show.html")]
pub struct MenuTemplate {
    pub menu: Arc<PublishedMenu>,
    pub count: u32,
}

/// GET /{username}
///
/// The QR-code landing page: the restaurant's full menu.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> Result<MenuTemplate> {
    let menu = state.published_menu(&username).await?;
    let cart = session_cart(&session, &username).await;

    Ok(MenuTemplate {
        menu,
        count: cart.item_count(),
    })
}
