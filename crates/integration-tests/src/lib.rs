//! End-to-end tests for the mapa user map service.
//!
//! These tests talk to a running server over HTTP, so they are `#[ignore]`d
//! by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and apply migrations
//! cargo run -p mapa-cli -- migrate
//!
//! # Start the server
//! cargo run -p mapa-server
//!
//! # Run the ignored tests
//! cargo test -p mapa-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `MAPA_BASE_URL` - Server under test (default: `http://127.0.0.1:3000`)
//! - `MAPA_DATABASE_URL` - Database for the `pg_store` tests (falls back to `DATABASE_URL`)

use mapa_core::Email;

/// Default server address, matching the server's default bind.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Base URL of the server under test, without a trailing slash.
#[must_use]
pub fn base_url() -> String {
    std::env::var("MAPA_BASE_URL")
        .ok()
        .filter(|v| !v.is_empty())
        .map_or_else(
            || DEFAULT_BASE_URL.to_owned(),
            |v| v.trim_end_matches('/').to_owned(),
        )
}

/// Full URL for `path` on the server under test.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// An owner email no other test run will collide with.
///
/// # Panics
///
/// Never in practice: the generated address is always valid.
#[must_use]
pub fn unique_email(prefix: &str) -> Email {
    Email::parse(&format!("{prefix}-{}@mapa.test", uuid::Uuid::new_v4().simple()))
        .expect("generated email is valid")
}
