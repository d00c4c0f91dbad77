//! Business services for the dashboard.

pub mod auth;
pub mod email;
pub mod paystack;
pub mod subscription;
