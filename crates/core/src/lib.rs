//! Mapa Core - Shared types library.
//!
//! This crate provides the types shared by every Mapa component:
//! - `server` - The user map HTTP API
//! - `cli` - Command-line tools for migrations and inspection
//! - `integration-tests` - HTTP-level tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. With the `postgres` feature enabled the ID and email
//! types also implement the `sqlx` encode/decode traits.
//!
//! # Modules
//!
//! - [`types`] - Owner emails, marker/map IDs and coordinates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
