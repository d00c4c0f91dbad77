//! Menulane Core - Shared types library.
//!
//! This crate provides common types used across all Menulane components:
//! - `storefront` - Public menu site customers browse and order from
//! - `dashboard` - Restaurant-owner application (menu builder, billing)
//! - `cli` - Command-line tools for migrations, seeding and the nightly sweep
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain logic - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, slugs and statuses
//! - [`entitlements`] - The static plan/feature catalog and subscription pricing
//! - [`subscription`] - Subscription records, renewal date math and the expiry sweep rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entitlements;
pub mod subscription;
pub mod types;

pub use types::*;
