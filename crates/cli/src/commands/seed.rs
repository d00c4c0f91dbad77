//! Seed the database with a demo restaurant.
//!
//! Creates an owner account on the free plan with a brand, two categories,
//! and a handful of menu items (including a combo), so a fresh install has
//! something to look at on `/{username}` right away.
//!
//! # Usage
//!
//! ```bash
//! ml-cli seed -e demo@menulane.app -u demo -p "a-demo-password"
//! ```
//!
//! # Environment Variables
//!
//! - `DASHBOARD_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use menulane_core::{Email, Money, Username};

use menulane_dashboard::db::{
    BrandInput, BrandRepository, CategoryRepository, MenuItemInput, MenuItemRepository,
    RepositoryError, UserRepository,
};
use menulane_dashboard::models::menu_item::SubItem;
use menulane_dashboard::services::auth::{self, AuthError};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Password validation or hashing failed.
    #[error("Password error: {0}")]
    Password(#[from] AuthError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create the demo owner, brand, categories, and menu items.
///
/// # Errors
///
/// Returns `SeedError` if the inputs are invalid, the owner already exists,
/// or a database write fails.
pub async fn run(email: &str, username: &str, password: &str) -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| SeedError::InvalidEmail(e.to_string()))?;
    let username =
        Username::parse(username).map_err(|e| SeedError::InvalidUsername(e.to_string()))?;
    auth::validate_password(password)?;
    let password_hash = auth::hash_password(password)?;

    let database_url = database_url()?;
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let user = UserRepository::new(&pool)
        .create(&email, &username, &password_hash)
        .await?;
    info!(user_id = %user.id, username = %username, "Created demo owner");

    BrandRepository::new(&pool)
        .upsert(
            user.id,
            &BrandInput {
                name: "Mama's Kitchen".to_owned(),
                description: Some("Home-style Nigerian cooking.".to_owned()),
                logo_url: None,
                primary_color: "#1f2937".to_owned(),
                accent_color: "#f59e0b".to_owned(),
                whatsapp_number: None,
            },
        )
        .await?;

    let categories = CategoryRepository::new(&pool);
    categories.create(user.id, "Mains", None).await?;
    categories.create(user.id, "Drinks", None).await?;

    let items = MenuItemRepository::new(&pool);
    items
        .create(
            user.id,
            &MenuItemInput {
                name: "Jollof Rice & Chicken".to_owned(),
                description: Some("Smoky party jollof with grilled chicken.".to_owned()),
                price: Money::from_minor(250_000),
                category: Some("Mains".to_owned()),
                images: Vec::new(),
                is_combo: false,
                sub_items: Vec::new(),
                is_available: true,
            },
        )
        .await?;
    items
        .create(
            user.id,
            &MenuItemInput {
                name: "Egusi & Pounded Yam".to_owned(),
                description: Some("With assorted meat.".to_owned()),
                price: Money::from_minor(300_000),
                category: Some("Mains".to_owned()),
                images: Vec::new(),
                is_combo: false,
                sub_items: Vec::new(),
                is_available: true,
            },
        )
        .await?;
    items
        .create(
            user.id,
            &MenuItemInput {
                name: "Chapman".to_owned(),
                description: None,
                price: Money::from_minor(80_000),
                category: Some("Drinks".to_owned()),
                images: Vec::new(),
                is_combo: false,
                sub_items: Vec::new(),
                is_available: true,
            },
        )
        .await?;
    items
        .create(
            user.id,
            &MenuItemInput {
                name: "Lunch Combo".to_owned(),
                description: Some("Jollof, chicken, and a drink.".to_owned()),
                price: Money::from_minor(320_000),
                category: Some("Mains".to_owned()),
                images: Vec::new(),
                is_combo: true,
                sub_items: vec![
                    SubItem {
                        id: "jollof".to_owned(),
                        name: "Jollof Rice".to_owned(),
                        price: Money::from_minor(200_000),
                    },
                    SubItem {
                        id: "chicken".to_owned(),
                        name: "Grilled Chicken".to_owned(),
                        price: Money::from_minor(100_000),
                    },
                    SubItem {
                        id: "chapman".to_owned(),
                        name: "Chapman".to_owned(),
                        price: Money::from_minor(80_000),
                    },
                ],
                is_available: true,
            },
        )
        .await?;

    info!(menu = %format!("/{username}"), "Seed complete");
    Ok(())
}

fn database_url() -> Result<secrecy::SecretString, SeedError> {
    if let Ok(value) = std::env::var("DASHBOARD_DATABASE_URL") {
        return Ok(secrecy::SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(secrecy::SecretString::from(value));
    }
    Err(SeedError::MissingEnvVar("DASHBOARD_DATABASE_URL"))
}
