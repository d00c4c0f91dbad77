//! Menulane Dashboard library.
//!
//! This crate provides the owner-dashboard functionality as a library,
//! allowing it to be tested and reused (the cli's `sweep` command drives the
//! repositories and services from here).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
