//! Geographic coordinates of a marker.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
///
/// Values are stored exactly as submitted. There is no range check: a
/// latitude of 120 is accepted and returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}
