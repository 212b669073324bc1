//! Domain Entities - Core business objects
//!
//! These entities represent the results flowing through the resolution
//! pipeline. They have no external dependencies beyond serde.

use crate::domain::value_objects::{GeoBox, GeoPoint, PlaceName};
use serde::Serialize;

/// Top-ranked candidate returned by a geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// Coordinates of the candidate
    pub point: GeoPoint,
    /// Provider-supplied bounding box, if any
    pub bounding_box: Option<GeoBox>,
    /// Human readable name reported by the provider
    pub display_name: Option<String>,
}

impl GeocodeCandidate {
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            bounding_box: None,
            display_name: None,
        }
    }

    pub fn with_bounding_box(mut self, bounding_box: GeoBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// A resolved geo-result, shaped by the active resolution mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geocoded {
    Point(GeoPoint),
    Box(GeoBox),
}

impl Geocoded {
    /// The point used for noise injection (box center in box mode).
    pub fn point(&self) -> GeoPoint {
        match self {
            Self::Point(p) => *p,
            Self::Box(b) => b.center(),
        }
    }

    pub fn bounding_box(&self) -> Option<GeoBox> {
        match self {
            Self::Point(_) => None,
            Self::Box(b) => Some(*b),
        }
    }
}

/// Terminal state of a successful resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// A location was extracted and geocoded
    Resolved,
    /// The extractor returned the `Unknown` sentinel
    UnknownLocation,
    /// The place could not be geocoded
    NotFound,
}

/// Outcome of resolving one piece of text.
///
/// Coordinates are already perturbed; the exact geocoded point never leaves
/// the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub extracted_location: PlaceName,
    pub coordinates: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<GeoBox>,
    pub status: ResolutionStatus,
    pub tweet_text: String,
    pub location_context: String,
}

impl Resolution {
    /// Result for text where no location could be determined.
    pub fn unknown(tweet_text: String, location_context: String) -> Self {
        Self {
            extracted_location: PlaceName::Unknown,
            coordinates: None,
            bounding_box: None,
            status: ResolutionStatus::UnknownLocation,
            tweet_text,
            location_context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Geocoded Tests =====

    #[test]
    fn test_geocoded_point() {
        let g = Geocoded::Point(GeoPoint::new(48.85, 2.35));
        assert_eq!(g.point(), GeoPoint::new(48.85, 2.35));
        assert!(g.bounding_box().is_none());
    }

    #[test]
    fn test_geocoded_box_uses_center() {
        let b = GeoBox::new(40.0, 42.0, -72.0, -70.0).unwrap();
        let g = Geocoded::Box(b);
        assert_eq!(g.point(), GeoPoint::new(41.0, -71.0));
        assert_eq!(g.bounding_box(), Some(b));
    }

    // ===== GeocodeCandidate Tests =====

    #[test]
    fn test_candidate_builder() {
        let b = GeoBox::new(1.0, 2.0, 3.0, 4.0).unwrap();
        let c = GeocodeCandidate::new(GeoPoint::new(1.5, 3.5)).with_bounding_box(b);
        assert_eq!(c.bounding_box, Some(b));
        assert!(c.display_name.is_none());
    }

    // ===== Resolution Tests =====

    #[test]
    fn test_unknown_resolution_serializes_null_coordinates() {
        let r = Resolution::unknown("i am who i am".to_string(), String::new());
        let json = serde_json::to_value(&r).unwrap();

        assert_eq!(json["extracted_location"], "Unknown");
        assert!(json["coordinates"].is_null());
        assert!(json.get("bounding_box").is_none());
        assert_eq!(json["status"], "unknown_location");
        assert_eq!(json["tweet_text"], "i am who i am");
        assert_eq!(json["location_context"], "");
    }

    #[test]
    fn test_resolved_serialization() {
        let r = Resolution {
            extracted_location: PlaceName::Canonical("Boston, Massachusetts".into()),
            coordinates: Some(GeoPoint::new(42.36, -71.06)),
            bounding_box: None,
            status: ResolutionStatus::Resolved,
            tweet_text: "hello".into(),
            location_context: "Boston, MA".into(),
        };
        let json = serde_json::to_value(&r).unwrap();

        assert_eq!(json["extracted_location"], "Boston, Massachusetts");
        assert_eq!(json["coordinates"], serde_json::json!([42.36, -71.06]));
        assert_eq!(json["status"], "resolved");
    }
}
