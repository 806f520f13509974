//! Core types: handles, geometry, configuration, errors.
//!
//! These are the leaf building blocks the rest of the engine composes.
//! Nothing here holds mutable engine state.

pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;

pub use config::{StageConfig, DEFAULT_MOVE_MS, DEFAULT_TELEPORT_MS};
pub use error::StageError;
pub use geometry::{relative_position, StageGeometry};
pub use ids::{TokenId, ZoneId};
