//! Menu item route handlers.
//!
//! Create enforces the plan cap before touching the database: a free
//! account holds at most five items, while `unlimited-items` (granted
//! with any pro subscription) lifts the cap. Image counts are clamped to
//! the plan's gallery limit the same way.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use menulane_core::entitlements::PlanLimits;
use menulane_core::{MenuItemId, Money, Plan};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::{MenuItemInput, MenuItemRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{SubItem, User};
use crate::state::AppState;

/// Error message shown when a free account hits the item cap.
pub const FREE_ITEM_LIMIT_MESSAGE: &str =
    "Free plan is limited to 5 menu items. Upgrade to Pro to add more.";

/// Menu item request body (create and update).
#[derive(Debug, Deserialize)]
pub struct MenuItemBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in kobo.
    pub price: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_combo: bool,
    #[serde(default)]
    pub sub_items: Vec<SubItem>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

const fn default_available() -> bool {
    true
}

fn validate_body(body: &MenuItemBody, user: &User) -> Result<MenuItemInput> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Item name is required".to_owned()));
    }
    if body.price < 0 {
        return Err(AppError::BadRequest("Price cannot be negative".to_owned()));
    }
    if body.is_combo && body.sub_items.is_empty() {
        return Err(AppError::BadRequest(
            "A combo needs at least one sub-item".to_owned(),
        ));
    }
    if !body.is_combo && !body.sub_items.is_empty() {
        return Err(AppError::BadRequest(
            "Sub-items are only allowed on combos".to_owned(),
        ));
    }

    let limits = effective_limits(user);
    if body.images.len() > limits.max_images_per_item {
        return Err(AppError::PlanLimit(format!(
            "Your plan allows up to {} image{} per item",
            limits.max_images_per_item,
            if limits.max_images_per_item == 1 { "" } else { "s" }
        )));
    }

    Ok(MenuItemInput {
        name: name.to_owned(),
        description: body.description.clone(),
        price: Money::from_minor(body.price),
        category: body.category.clone(),
        images: body.images.clone(),
        is_combo: body.is_combo,
        sub_items: body.sub_items.clone(),
        is_available: body.is_available,
    })
}

/// Content limits for a user, honoring held features over the raw plan.
fn effective_limits(user: &User) -> PlanLimits {
    if user.subscription.has_feature("unlimited-items") {
        PlanLimits::for_plan(Plan::Pro)
    } else {
        PlanLimits::for_plan(Plan::Free)
    }
}

async fn load_user(state: &AppState, id: menulane_core::UserId) -> Result<User> {
    UserRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("account".to_owned()))
}

/// GET /api/menu/items
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_items(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let items = MenuItemRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(json!({ "success": true, "items": items })))
}

/// POST /api/menu/items
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<MenuItemBody>,
) -> Result<impl IntoResponse> {
    let account = load_user(&state, user.id).await?;
    let input = validate_body(&body, &account)?;

    let items = MenuItemRepository::new(state.pool());
    if let Some(cap) = effective_limits(&account).max_menu_items {
        let count = items.count_for_user(user.id).await?;
        if count >= cap as i64 {
            return Err(AppError::PlanLimit(FREE_ITEM_LIMIT_MESSAGE.to_owned()));
        }
    }

    let item = items.create(user.id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "item": item })),
    ))
}

/// PUT /api/menu/items/{id}
///
/// Updating an existing item is allowed even when the account already
/// holds more items than its plan permits; only adding new ones is
/// capped.
#[instrument(skip_all, fields(user_id = %user.id, item_id = %id))]
pub async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<MenuItemId>,
    Json(body): Json<MenuItemBody>,
) -> Result<impl IntoResponse> {
    let account = load_user(&state, user.id).await?;
    let input = validate_body(&body, &account)?;

    let item = MenuItemRepository::new(state.pool())
        .update(user.id, id, &input)
        .await?;

    Ok(Json(json!({ "success": true, "item": item })))
}

/// DELETE /api/menu/items/{id}
#[instrument(skip_all, fields(user_id = %user.id, item_id = %id))]
pub async fn delete_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<MenuItemId>,
) -> Result<impl IntoResponse> {
    let deleted = MenuItemRepository::new(state.pool())
        .delete(user.id, id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!("menu item {id}")));
    }

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use menulane_core::subscription::Subscription;
    use menulane_core::{Email, UserId, Username};

    use super::*;

    fn free_user() -> User {
        User {
            id: UserId::new(1),
            email: Email::parse("owner@example.com").unwrap(),
            username: Username::parse("mamas-kitchen").unwrap(),
            subscription: Subscription::free(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn body(name: &str) -> MenuItemBody {
        MenuItemBody {
            name: name.to_owned(),
            description: None,
            price: 150_000,
            category: None,
            images: Vec::new(),
            is_combo: false,
            sub_items: Vec::new(),
            is_available: true,
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(validate_body(&body("   "), &free_user()).is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut b = body("Jollof");
        b.price = -1;
        assert!(validate_body(&b, &free_user()).is_err());
    }

    #[test]
    fn test_combo_requires_sub_items() {
        let mut b = body("Lunch Combo");
        b.is_combo = true;
        assert!(validate_body(&b, &free_user()).is_err());
    }

    #[test]
    fn test_free_plan_caps_gallery_at_one_image() {
        let mut b = body("Jollof");
        b.images = vec!["a.jpg".to_owned(), "b.jpg".to_owned()];
        assert!(validate_body(&b, &free_user()).is_err());

        b.images.truncate(1);
        assert!(validate_body(&b, &free_user()).is_ok());
    }

    #[test]
    fn test_free_plan_item_cap_is_five() {
        let limits = effective_limits(&free_user());
        assert_eq!(limits.max_menu_items, Some(5));
        assert_eq!(
            FREE_ITEM_LIMIT_MESSAGE,
            "Free plan is limited to 5 menu items. Upgrade to Pro to add more."
        );
    }
}
