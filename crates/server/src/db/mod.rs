//! User map storage.
//!
//! # Database: `mapa`
//!
//! ## Tables
//!
//! - `user_map` - One row per owner email. Markers (`marcadores`) and visits
//!   (`visitas`) are embedded `JSONB` arrays, so every operation touches a
//!   single row and is atomic on its own.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p mapa-cli -- migrate
//! ```
//!
//! # Backends
//!
//! - [`PgUserMapStore`] - `PostgreSQL`, used in production
//! - [`MemoryUserMapStore`] - in-process, used by tests and `MAPA_STORE=memory`

pub mod memory;
pub mod user_maps;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use mapa_core::{Email, MarkerId};

use crate::models::{Marker, UserMap, Visit};

pub use memory::MemoryUserMapStore;
pub use user_maps::PgUserMapStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate document ID).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Document operations the user map API needs.
///
/// Each mutation is atomic with respect to one owner's map. Operations on
/// different owners never interact. "Not found" is reported as `Ok(None)`;
/// `Err` is reserved for store failures.
#[async_trait]
pub trait UserMapStore: Send + Sync {
    /// Exact-match lookup by owner.
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserMap>, RepositoryError>;

    /// Append `marker` to the owner's map, creating the map if it does not
    /// exist yet. Returns the map after the append.
    async fn push_marker(&self, email: &Email, marker: Marker)
    -> Result<UserMap, RepositoryError>;

    /// Append `visit` to an existing map. Never creates a map: returns
    /// `Ok(None)` when the owner has none.
    async fn push_visit(
        &self,
        email: &Email,
        visit: Visit,
    ) -> Result<Option<UserMap>, RepositoryError>;

    /// Remove the marker with `marker_id`, keeping the order of the rest.
    /// Returns `Ok(None)` when the owner has no map or the map has no such
    /// marker.
    async fn pull_marker(
        &self,
        email: &Email,
        marker_id: MarkerId,
    ) -> Result<Option<UserMap>, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2.min(max_connections))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the embedded migrations from `crates/server/migrations/`.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history does
/// not match the embedded files.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
