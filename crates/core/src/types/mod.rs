//! Core types for Mapa.
//!
//! This module provides type-safe wrappers for the user map domain.

pub mod coordinates;
pub mod email;
pub mod id;

pub use coordinates::Coordinates;
pub use email::{Email, EmailError};
pub use id::*;
