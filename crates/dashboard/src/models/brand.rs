//! Brand customization domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use menulane_core::{BrandId, UserId};

/// Per-restaurant branding, 1:1 with the owning user.
///
/// Colors and logo only take effect on the public menu while the owner holds
/// the `custom-branding` entitlement.
#[derive(Debug, Clone, Serialize)]
pub struct Brand {
    pub id: BrandId,
    pub user_id: UserId,
    /// Display name shown on the public menu header.
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    /// Hex color for the menu header and accents.
    pub primary_color: String,
    /// Hex color for prices and buttons.
    pub accent_color: String,
    /// E.164 number WhatsApp orders are sent to, if ordering is enabled.
    pub whatsapp_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Default header color for brands that never customized.
pub const DEFAULT_PRIMARY_COLOR: &str = "#1f2937";
/// Default accent color for brands that never customized.
pub const DEFAULT_ACCENT_COLOR: &str = "#f59e0b";
