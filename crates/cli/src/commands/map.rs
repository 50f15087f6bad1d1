//! User map inspection commands.
//!
//! # Usage
//!
//! ```bash
//! mapa-cli map show ana@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `MAPA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use mapa_core::{Email, EmailError};
use mapa_server::config::{ConfigError, get_database_url};
use mapa_server::db::{self, PgUserMapStore, RepositoryError, UserMapStore};
use thiserror::Error;

/// Errors that can occur while inspecting maps.
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),

    #[error("No map found for {0}")]
    NotFound(Email),

    #[error("Could not encode map: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Print the map owned by `email` as pretty JSON.
///
/// The output has the same shape as `GET /api/mapa/{email}`.
///
/// # Errors
///
/// Returns `MapError::NotFound` if the owner has no map, or another variant
/// if the email is invalid or the database is unreachable.
pub async fn show(email: &str) -> Result<(), MapError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    let database_url = get_database_url("MAPA_DATABASE_URL")?;
    let pool = db::create_pool(&database_url, 1).await?;
    let store = PgUserMapStore::new(pool);

    let map = store
        .find_by_email(&email)
        .await?
        .ok_or(MapError::NotFound(email))?;

    tracing::debug!(markers = map.markers.len(), visits = map.visits.len(), "Map loaded");

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&map)?);
    }

    Ok(())
}
