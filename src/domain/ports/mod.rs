mod geo_cache;
mod geocoding_provider;
mod inference_backend;

pub use geo_cache::{CacheError, GeoCache};
pub use geocoding_provider::{GeocodeError, GeocodingProvider};
pub use inference_backend::{InferenceBackend, InferenceError};
