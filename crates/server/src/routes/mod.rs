//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health              - Liveness check
//! GET    /health/ready        - Readiness check (pings the store)
//!
//! # User map API
//! POST   /api/mapa/marcador   - Add a marker (creates the map on first use)
//! DELETE /api/mapa/marcador   - Remove a marker
//! POST   /api/mapa/visita     - Record a visit on an existing map
//! GET    /api/mapa/{email}    - Get an owner's map
//! ```
//!
//! `GET /api/mapa/marcador` and `GET /api/mapa/visita` are owner lookups too.

pub mod health;
pub mod mapa;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the user map API router.
pub fn mapa_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/marcador",
            get(mapa::get_shadowed_map)
                .post(mapa::add_marker)
                .delete(mapa::delete_marker),
        )
        .route(
            "/visita",
            get(mapa::get_shadowed_map).post(mapa::add_visit),
        )
        .route("/{email}", get(mapa::get_map))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/mapa", mapa_routes())
}
