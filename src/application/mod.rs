//! Application Layer
//!
//! Use cases composed from domain services and ports.

mod geocode_resolver;
mod location_extractor;
mod resolution_service;

pub use geocode_resolver::{GeocodeResolver, ResolverCache, DEFAULT_BOX_HALF_WIDTH};
pub use location_extractor::{LocationExtractor, FEW_SHOT_PROMPT};
pub use resolution_service::{ResolutionService, ResolveError};
