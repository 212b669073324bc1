//! Nominatim Geocoder
//!
//! Implements GeocodingProvider against the OpenStreetMap Nominatim
//! search API (or any server speaking the same protocol).

use crate::domain::entities::GeocodeCandidate;
use crate::domain::ports::{GeocodeError, GeocodingProvider};
use crate::domain::value_objects::{GeoBox, GeoPoint};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Nominatim client configuration.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL of the service (the `/search` path is appended)
    pub base_url: String,
    /// User-Agent identifying this application, required by the usage policy
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Ask for the address breakdown (`addressdetails=1`)
    pub address_details: bool,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "location-extraction-api/1.0".to_string(),
            timeout: Duration::from_secs(10),
            address_details: true,
        }
    }
}

/// Coordinates arrive as strings from Nominatim; some mirrors send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Text(String),
    Number(f64),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        let v = match self {
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Number(n) => *n,
        };
        v.is_finite().then_some(v)
    }
}

/// One entry of the search response array.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: Degrees,
    lon: Degrees,
    #[serde(default)]
    boundingbox: Option<Vec<Degrees>>,
    #[serde(default)]
    display_name: Option<String>,
}

/// Nominatim-backed geocoding provider.
pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    /// Build a geocoder with its own HTTP client.
    pub fn new(config: NominatimConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }

    fn parse_candidate(result: SearchResult) -> Result<GeocodeCandidate, GeocodeError> {
        let point = match (result.lat.value(), result.lon.value()) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => {
                return Err(GeocodeError::Decode(
                    "non-numeric lat/lon in top result".to_string(),
                ))
            }
        };
        if !point.is_valid() {
            return Err(GeocodeError::Decode(format!(
                "coordinates out of range: {}, {}",
                point.lat, point.lon
            )));
        }

        // boundingbox is [south, north, west, east]
        let bounding_box = result.boundingbox.as_deref().and_then(|bounds| {
            let values: Option<Vec<f64>> = bounds.iter().map(Degrees::value).collect();
            match values.as_deref() {
                Some(&[south, north, west, east]) => GeoBox::new(south, north, west, east),
                _ => None,
            }
        });
        if result.boundingbox.is_some() && bounding_box.is_none() {
            tracing::debug!("ignoring malformed bounding box {:?}", result.boundingbox);
        }

        Ok(GeocodeCandidate {
            point,
            bounding_box,
            display_name: result.display_name,
        })
    }
}

#[async_trait]
impl GeocodingProvider for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeCandidate>, GeocodeError> {
        let mut params = vec![("q", query), ("format", "json"), ("limit", "1")];
        if self.config.address_details {
            params.push(("addressdetails", "1"));
        }

        let response = self
            .client
            .get(self.search_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let results: Vec<SearchResult> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        match results.into_iter().next() {
            Some(top) => Self::parse_candidate(top).map(Some),
            None => Ok(None),
        }
    }
}
