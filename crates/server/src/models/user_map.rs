//! User map document and its embedded markers and visits.
//!
//! These types serialize with the field names the API exposes and the
//! store persists (`email`, `marcadores`, `visitas`, `nombreLugar`, ...),
//! so a stored document and an API response have the same shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mapa_core::{Coordinates, Email, MarkerId, UserMapId};

/// One owner's map: every marker they placed and every visit they received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMap {
    /// Document ID assigned when the map is first created.
    #[serde(rename = "_id")]
    pub id: UserMapId,
    /// Owner identity. Unique across all maps.
    pub email: Email,
    /// Markers in insertion order.
    #[serde(rename = "marcadores")]
    pub markers: Vec<Marker>,
    /// Visits in insertion order.
    #[serde(rename = "visitas")]
    pub visits: Vec<Visit>,
    /// When the map was first created.
    #[serde(rename = "creadoEn")]
    pub created_at: DateTime<Utc>,
}

impl UserMap {
    /// An empty map for `email`, created at `now`.
    #[must_use]
    pub fn new(email: Email, now: DateTime<Utc>) -> Self {
        Self {
            id: UserMapId::generate(),
            email,
            markers: Vec::new(),
            visits: Vec::new(),
            created_at: now,
        }
    }
}

/// A named place on an owner's map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(rename = "_id")]
    pub id: MarkerId,
    #[serde(rename = "nombreLugar")]
    pub place_name: String,
    #[serde(rename = "coordenadas")]
    pub coordinates: Coordinates,
    #[serde(
        rename = "imagenUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(rename = "creadoEn")]
    pub created_at: DateTime<Utc>,
}

/// A validated marker that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarker {
    pub place_name: String,
    pub coordinates: Coordinates,
    pub image_url: Option<String>,
}

impl NewMarker {
    /// Assign an ID and creation time.
    #[must_use]
    pub fn into_marker(self, now: DateTime<Utc>) -> Marker {
        Marker {
            id: MarkerId::generate(),
            place_name: self.place_name,
            coordinates: self.coordinates,
            image_url: self.image_url,
            created_at: now,
        }
    }
}

/// Someone looked at an owner's map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    #[serde(rename = "visitanteEmail")]
    pub visitor_email: Email,
    pub timestamp: DateTime<Utc>,
}

impl Visit {
    #[must_use]
    pub const fn new(visitor_email: Email, timestamp: DateTime<Utc>) -> Self {
        Self {
            visitor_email,
            timestamp,
        }
    }
}
