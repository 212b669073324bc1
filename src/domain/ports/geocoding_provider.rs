//! Geocoding Provider Port
//!
//! Defines the interface for turning a place query into coordinates.

use crate::domain::entities::GeocodeCandidate;
use async_trait::async_trait;

/// Failure talking to the geocoding provider.
///
/// The resolver logs these and reports the place as not found.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("geocoding provider returned status {0}")]
    Status(u16),
    #[error("malformed geocoding response: {0}")]
    Decode(String),
}

/// External geocoding service.
///
/// This is an outbound port. Implementations issue exactly one request per
/// call and return only the top-ranked candidate.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Geocode a query string.
    ///
    /// Returns `Ok(None)` when the provider has no candidate for the query.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeCandidate>, GeocodeError>;
}
