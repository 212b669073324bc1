//! Location Resolver Library
//!
//! This module exposes the location resolution components for use in
//! integration tests and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{
    GeocodeResolver, LocationExtractor, ResolutionService, ResolveError, ResolverCache,
};
pub use config::load_config;
pub use domain::entities::{GeocodeCandidate, Geocoded, Resolution, ResolutionStatus};
pub use domain::ports::{GeoCache, GeocodingProvider, InferenceBackend};
pub use domain::services::NoiseInjector;
pub use domain::value_objects::{GeoBox, GeoPoint, PlaceName, ResolutionMode};
pub use infrastructure::{RateLimitConfig, RateLimiter};
