//! End-to-end HTTP smoke tests.
//!
//! These require both servers running against a migrated, seeded database:
//!
//! ```bash
//! ml-cli migrate && ml-cli seed -p "a-demo-password"
//! cargo run -p menulane-storefront &
//! cargo run -p menulane-dashboard &
//! cargo test -p menulane-integration-tests -- --ignored
//! ```

use reqwest::StatusCode;

fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

fn dashboard_base_url() -> String {
    std::env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_owned())
}

#[tokio::test]
#[ignore = "Requires a running storefront server"]
async fn storefront_health() {
    let resp = reqwest::get(format!("{}/health", storefront_base_url()))
        .await
        .expect("storefront should be reachable");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running dashboard server"]
async fn dashboard_health() {
    let resp = reqwest::get(format!("{}/health", dashboard_base_url()))
        .await
        .expect("dashboard should be reachable");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running storefront server and seeded data"]
async fn seeded_menu_renders() {
    let resp = reqwest::get(format!("{}/demo", storefront_base_url()))
        .await
        .expect("storefront should be reachable");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("body should be readable");
    assert!(body.contains("Mama's Kitchen"));
}

#[tokio::test]
#[ignore = "Requires a running storefront server"]
async fn unknown_restaurant_is_a_404() {
    let resp = reqwest::get(format!("{}/no-such-restaurant", storefront_base_url()))
        .await
        .expect("storefront should be reachable");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
