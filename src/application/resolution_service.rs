//! Resolution Service - Main application use case
//!
//! Orchestrates the pipeline: extract a place-name, resolve it through the
//! cache or the geocoding provider, then blur the point for privacy.
//! This is the primary interface for the inbound adapter.

use crate::application::{GeocodeResolver, LocationExtractor};
use crate::domain::entities::{Resolution, ResolutionStatus};
use crate::domain::ports::{CacheError, InferenceError};
use crate::domain::services::{NoiseInjector, DEFAULT_NOISE_KM};
use crate::domain::value_objects::{PlaceName, ResolutionMode};

/// Failure of a resolution request.
///
/// `Unknown` locations and geocoding misses are not errors; they are
/// successful resolutions without coordinates.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The inference backend failed while extracting the location.
    #[error("location extraction failed: {0}")]
    Extraction(#[from] InferenceError),
    /// A freshly geocoded result could not be persisted.
    #[error("geocode cache failure: {0}")]
    Cache(#[from] CacheError),
}

impl ResolveError {
    /// Short machine-readable kind for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Extraction(_) => "extraction",
            Self::Cache(_) => "cache",
        }
    }
}

/// Resolution service - main application use case.
///
/// For each request:
/// 1. Extracts a canonical place-name (or `Unknown`)
/// 2. Resolves it via the geocode resolver (cache, then provider)
/// 3. Perturbs the resolved point within `noise_km`
pub struct ResolutionService {
    extractor: LocationExtractor,
    resolver: GeocodeResolver,
    noise_km: f64,
}

impl ResolutionService {
    /// Create a new resolution service.
    pub fn new(extractor: LocationExtractor, resolver: GeocodeResolver) -> Self {
        Self {
            extractor,
            resolver,
            noise_km: DEFAULT_NOISE_KM,
        }
    }

    /// Set the maximum perturbation radius in kilometres.
    pub fn with_noise_km(mut self, noise_km: f64) -> Self {
        self.noise_km = noise_km;
        self
    }

    /// Resolve free-form text (plus optional context) to blurred coordinates.
    ///
    /// # Arguments
    /// * `text` - Post content
    /// * `context` - Optional metadata hint; empty when absent
    ///
    /// # Returns
    /// A `Resolution` echoing the input, or an error when the inference
    /// backend or the cache failed
    pub async fn resolve(&self, text: &str, context: &str) -> Result<Resolution, ResolveError> {
        let place = self.extractor.extract(text, context).await?;

        let query = match &place {
            PlaceName::Canonical(query) => query,
            PlaceName::Unknown => {
                tracing::debug!("no location in text, skipping geocoding");
                return Ok(Resolution::unknown(text.to_string(), context.to_string()));
            }
        };

        let geocoded = self.resolver.resolve(query).await?;

        let status = if geocoded.is_some() {
            ResolutionStatus::Resolved
        } else {
            ResolutionStatus::NotFound
        };
        let coordinates = NoiseInjector::perturb(geocoded.map(|g| g.point()), self.noise_km);

        tracing::debug!("resolved {} -> {:?} ({:?})", place, coordinates, status);

        Ok(Resolution {
            extracted_location: place,
            coordinates,
            bounding_box: geocoded.and_then(|g| g.bounding_box()),
            status,
            tweet_text: text.to_string(),
            location_context: context.to_string(),
        })
    }

    pub fn mode(&self) -> ResolutionMode {
        self.resolver.mode()
    }

    /// Number of cached places.
    pub fn cache_size(&self) -> usize {
        self.resolver.cache_size()
    }

    pub fn noise_km(&self) -> f64 {
        self.noise_km
    }
}
