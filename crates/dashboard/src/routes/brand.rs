//! Branding route handlers.
//!
//! Custom colors and logo require the `custom-branding` add-on; the name,
//! description and WhatsApp number are available on every plan. Without
//! the add-on the submitted colors are replaced with the defaults rather
//! than rejected, so a lapsed subscription degrades quietly.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::db::{BrandInput, BrandRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::brand::{DEFAULT_ACCENT_COLOR, DEFAULT_PRIMARY_COLOR};
use crate::state::AppState;

/// Brand request body.
#[derive(Debug, Deserialize)]
pub struct BrandBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub whatsapp_number: Option<String>,
}

fn valid_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// GET /api/brand
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let brand = BrandRepository::new(state.pool())
        .get_for_user(user.id)
        .await?;

    Ok(Json(json!({ "success": true, "brand": brand })))
}

/// PUT /api/brand
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn upsert(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<BrandBody>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest(
            "Restaurant name is required".to_owned(),
        ));
    }

    for color in [&body.primary_color, &body.accent_color]
        .into_iter()
        .flatten()
    {
        if !valid_hex_color(color) {
            return Err(AppError::BadRequest(format!(
                "'{color}' is not a valid hex color"
            )));
        }
    }

    let account = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account".to_owned()))?;
    let can_brand = account.subscription.has_feature("custom-branding");

    let input = BrandInput {
        name: name.to_owned(),
        description: body.description,
        logo_url: if can_brand { body.logo_url } else { None },
        primary_color: if can_brand {
            body.primary_color
                .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_owned())
        } else {
            DEFAULT_PRIMARY_COLOR.to_owned()
        },
        accent_color: if can_brand {
            body.accent_color
                .unwrap_or_else(|| DEFAULT_ACCENT_COLOR.to_owned())
        } else {
            DEFAULT_ACCENT_COLOR.to_owned()
        },
        whatsapp_number: body.whatsapp_number,
    };

    let brand = BrandRepository::new(state.pool())
        .upsert(user.id, &input)
        .await?;

    Ok(Json(json!({ "success": true, "brand": brand })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hex_color() {
        assert!(valid_hex_color("#1f2937"));
        assert!(valid_hex_color("#FFFFFF"));
        assert!(!valid_hex_color("1f2937"));
        assert!(!valid_hex_color("#fff"));
        assert!(!valid_hex_color("#zzzzzz"));
    }
}
