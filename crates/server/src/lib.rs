//! Mapa server library.
//!
//! The user map API as a library, so the binary, the CLI and the router
//! tests share one implementation.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`db`] - The [`UserMapStore`](db::UserMapStore) seam and its backends
//! - [`models`] - User map, marker and visit documents
//! - [`routes`] - HTTP handlers
//! - [`app`] - Router assembly

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod state;

pub use app::build_router;
pub use state::AppState;
