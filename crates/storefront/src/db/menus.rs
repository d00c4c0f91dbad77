//! Published menu reads.
//!
//! A published menu is assembled from four tables written by the
//! dashboard: the owner row (for entitlements), their brand, their
//! categories and their items. Entitlements are enforced here rather
//! than at render time: a lapsed subscription yields a menu with
//! default branding and WhatsApp ordering switched off, with no
//! template logic involved.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;

use menulane_core::{MenuItemId, Money, UserId};

use crate::error::{AppError, Result};

/// Default header color for unbranded menus.
pub const DEFAULT_PRIMARY_COLOR: &str = "#1f2937";
/// Default accent color for unbranded menus.
pub const DEFAULT_ACCENT_COLOR: &str = "#f59e0b";

/// Category label used for items whose category no longer exists.
pub const FALLBACK_SECTION: &str = "Other";

/// A combo's included item snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    pub id: String,
    pub name: String,
    pub price: Money,
}

/// One item as shown on the public menu.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemView {
    pub id: MenuItemId,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub images: Vec<String>,
    pub is_combo: bool,
    pub sub_items: Vec<SubItem>,
    pub is_available: bool,
}

/// A category heading with its items, in display order.
#[derive(Debug, Clone, Serialize)]
pub struct MenuSection {
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<MenuItemView>,
}

/// Branding as applied to the public menu.
#[derive(Debug, Clone, Serialize)]
pub struct BrandView {
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub accent_color: String,
}

/// A restaurant's complete published menu.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedMenu {
    pub owner_id: UserId,
    pub username: String,
    pub brand: BrandView,
    pub sections: Vec<MenuSection>,
    /// E.164 number orders go to; set only while the owner holds the
    /// `whatsapp-ordering` entitlement and configured a number.
    pub whatsapp_number: Option<String>,
}

#[derive(sqlx::FromRow)]
struct OwnerRow {
    id: i32,
    username: String,
    subscription_status: String,
    features: Vec<String>,
}

impl OwnerRow {
    fn has_feature(&self, feature_id: &str) -> bool {
        self.subscription_status == "active" && self.features.iter().any(|f| f == feature_id)
    }
}

#[derive(sqlx::FromRow)]
struct BrandRow {
    name: String,
    description: Option<String>,
    logo_url: Option<String>,
    primary_color: String,
    accent_color: String,
    whatsapp_number: Option<String>,
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    name: String,
    description: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: i64,
    category: Option<String>,
    images: Json<Vec<String>>,
    is_combo: bool,
    sub_items: Json<Vec<SubItem>>,
    is_available: bool,
}

impl From<ItemRow> for MenuItemView {
    fn from(row: ItemRow) -> Self {
        Self {
            id: MenuItemId::new(row.id),
            name: row.name,
            description: row.description,
            price: Money::from_minor(row.price),
            images: row.images.0,
            is_combo: row.is_combo,
            sub_items: row.sub_items.0,
            is_available: row.is_available,
        }
    }
}

/// Repository for assembling published menus.
pub struct MenuRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MenuRepository<'a> {
    /// Create a new menu repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load the published menu for a slug.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MenuNotFound` if no account owns the slug, and
    /// `AppError::Database` on query failure.
    pub async fn get_published(&self, username: &str) -> Result<PublishedMenu> {
        let owner: OwnerRow = sqlx::query_as(
            "SELECT id, username, subscription_status, features FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?
        .ok_or(AppError::MenuNotFound)?;

        let owner_id = UserId::new(owner.id);
        let branding = owner.has_feature("custom-branding");
        let whatsapp = owner.has_feature("whatsapp-ordering");

        let brand: Option<BrandRow> = sqlx::query_as(
            "SELECT name, description, logo_url, primary_color, accent_color, whatsapp_number
             FROM brands WHERE user_id = $1",
        )
        .bind(owner.id)
        .fetch_optional(self.pool)
        .await?;

        let categories: Vec<CategoryRow> = sqlx::query_as(
            "SELECT name, description FROM categories
             WHERE user_id = $1 ORDER BY sort_order, id",
        )
        .bind(owner.id)
        .fetch_all(self.pool)
        .await?;

        let items: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, name, description, price, category, images, is_combo, sub_items, is_available
             FROM menu_items WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(owner.id)
        .fetch_all(self.pool)
        .await?;

        let whatsapp_number = brand
            .as_ref()
            .filter(|_| whatsapp)
            .and_then(|b| b.whatsapp_number.clone());

        let brand_view = brand.map_or_else(
            || BrandView {
                name: owner.username.clone(),
                description: None,
                logo_url: None,
                primary_color: DEFAULT_PRIMARY_COLOR.to_owned(),
                accent_color: DEFAULT_ACCENT_COLOR.to_owned(),
            },
            |b| {
                if branding {
                    BrandView {
                        name: b.name,
                        description: b.description,
                        logo_url: b.logo_url,
                        primary_color: b.primary_color,
                        accent_color: b.accent_color,
                    }
                } else {
                    BrandView {
                        name: b.name,
                        description: b.description,
                        logo_url: None,
                        primary_color: DEFAULT_PRIMARY_COLOR.to_owned(),
                        accent_color: DEFAULT_ACCENT_COLOR.to_owned(),
                    }
                }
            },
        );

        let sections = group_sections(categories, items);

        Ok(PublishedMenu {
            owner_id,
            username: owner.username,
            brand: brand_view,
            sections,
            whatsapp_number,
        })
    }
}

/// Group items under their categories in display order; items with a
/// missing or deleted category land in a trailing fallback section.
fn group_sections(categories: Vec<CategoryRow>, items: Vec<ItemRow>) -> Vec<MenuSection> {
    let mut sections: Vec<MenuSection> = categories
        .into_iter()
        .map(|c| MenuSection {
            name: c.name,
            description: c.description,
            items: Vec::new(),
        })
        .collect();
    let mut fallback: Vec<MenuItemView> = Vec::new();

    for item in items {
        let category = item.category.clone();
        let view = MenuItemView::from(item);
        match category.and_then(|name| sections.iter_mut().find(|s| s.name == name)) {
            Some(section) => section.items.push(view),
            None => fallback.push(view),
        }
    }

    if !fallback.is_empty() {
        sections.push(MenuSection {
            name: FALLBACK_SECTION.to_owned(),
            description: None,
            items: fallback,
        });
    }

    sections.retain(|s| !s.items.is_empty());
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: Option<&str>) -> ItemRow {
        ItemRow {
            id: 1,
            name: name.to_owned(),
            description: None,
            price: 150_000,
            category: category.map(str::to_owned),
            images: Json(Vec::new()),
            is_combo: false,
            sub_items: Json(Vec::new()),
            is_available: true,
        }
    }

    #[test]
    fn test_group_sections_follows_category_order() {
        let categories = vec![
            CategoryRow {
                name: "Mains".to_owned(),
                description: None,
            },
            CategoryRow {
                name: "Drinks".to_owned(),
                description: None,
            },
        ];
        let items = vec![
            item("Chapman", Some("Drinks")),
            item("Jollof rice", Some("Mains")),
        ];

        let sections = group_sections(categories, items);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Mains");
        assert_eq!(sections[0].items[0].name, "Jollof rice");
        assert_eq!(sections[1].name, "Drinks");
    }

    #[test]
    fn test_orphaned_items_fall_back() {
        let items = vec![item("Suya", Some("Deleted category")), item("Puff puff", None)];
        let sections = group_sections(Vec::new(), items);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, FALLBACK_SECTION);
        assert_eq!(sections[0].items.len(), 2);
    }

    #[test]
    fn test_empty_sections_dropped() {
        let categories = vec![CategoryRow {
            name: "Empty".to_owned(),
            description: None,
        }];
        let sections = group_sections(categories, Vec::new());
        assert!(sections.is_empty());
    }
}
