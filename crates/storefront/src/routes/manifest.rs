//! Web app manifest route handler.
//!
//! Each restaurant gets its own manifest so "Add to Home Screen" installs
//! their menu under their name and colors. Restaurants with a logo get it
//! as the icon; the rest get a generated SVG with the restaurant's
//! initials on their brand color.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// GET /{username}/manifest.webmanifest
#[instrument(skip(state))]
pub async fn webmanifest(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response> {
    let menu = state.published_menu(&username).await?;

    let icons = menu.brand.logo_url.as_ref().map_or_else(
        || {
            let icon = initials_icon(&menu.brand.name, &menu.brand.primary_color);
            serde_json::json!([{
                "src": icon,
                "sizes": "512x512",
                "type": "image/svg+xml"
            }])
        },
        |logo| {
            serde_json::json!([{
                "src": logo,
                "sizes": "512x512",
                "type": "image/png"
            }])
        },
    );

    let manifest = serde_json::json!({
        "name": menu.brand.name,
        "short_name": menu.brand.name,
        "start_url": format!("/{}", menu.username),
        "scope": format!("/{}", menu.username),
        "icons": icons,
        "theme_color": menu.brand.primary_color,
        "background_color": "#ffffff",
        "display": "standalone"
    });

    Ok((
        [(header::CONTENT_TYPE, "application/manifest+json")],
        manifest.to_string(),
    )
        .into_response())
}

/// Build a data-URL SVG icon from the restaurant's initials.
fn initials_icon(name: &str, color: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase();
    let initials = if initials.is_empty() {
        "M".to_owned()
    } else {
        initials
    };

    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='512' height='512'>\
         <rect width='512' height='512' rx='64' fill='{color}'/>\
         <text x='50%' y='50%' dy='.35em' text-anchor='middle' \
         font-family='sans-serif' font-size='224' fill='#ffffff'>{initials}</text></svg>"
    );

    format!("data:image/svg+xml,{}", urlencoding::encode(&svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_from_name() {
        let icon = initials_icon("Mama's Kitchen", "#1f2937");
        assert!(icon.starts_with("data:image/svg+xml,"));
        assert!(icon.contains(&urlencoding::encode("MK").into_owned()));
    }

    #[test]
    fn test_empty_name_falls_back() {
        let icon = initials_icon("", "#1f2937");
        assert!(icon.contains('M'));
    }
}
