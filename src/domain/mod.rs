//! Domain Layer
//!
//! Value objects, entities, ports and pure services of the resolution
//! pipeline.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use value_objects::{GeoBox, GeoPoint, PlaceName, ResolutionMode};
