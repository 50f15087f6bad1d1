//! Domain models for the user map service.

pub mod user_map;

pub use user_map::{Marker, NewMarker, UserMap, Visit};
