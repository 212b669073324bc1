//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Literal the extractor emits when no location can be determined.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Canonical place-name produced by the location extractor.
///
/// `Unknown` is the sentinel for "no location could be determined" and
/// short-circuits geocoding, caching and noise injection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlaceName {
    /// Best-effort place string, used as an opaque geocoding query.
    Canonical(String),
    /// No location could be determined.
    Unknown,
}

impl PlaceName {
    /// Build a place-name from raw model output.
    ///
    /// Trims whitespace and one pair of surrounding double quotes.
    /// Empty output and the literal `Unknown` (any case) map to the sentinel.
    ///
    /// # Examples
    /// ```
    /// use location_resolver::PlaceName;
    ///
    /// assert_eq!(PlaceName::parse("  \"Paris, France\" "), PlaceName::Canonical("Paris, France".into()));
    /// assert_eq!(PlaceName::parse(""), PlaceName::Unknown);
    /// assert_eq!(PlaceName::parse("unknown"), PlaceName::Unknown);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(trimmed)
            .trim();

        if unquoted.is_empty() || unquoted.eq_ignore_ascii_case(UNKNOWN_LOCATION) {
            Self::Unknown
        } else {
            Self::Canonical(unquoted.to_string())
        }
    }

    /// The geocoding query for this place, or None for the sentinel.
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Canonical(s) => Some(s),
            Self::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Canonical(s) => s,
            Self::Unknown => UNKNOWN_LOCATION,
        }
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for PlaceName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A (latitude, longitude) pair in degrees.
///
/// Serialized as a `[lat, lon]` array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and inside the legal range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.lat, self.lon].serialize(serializer)
    }
}

/// A rectangular lat/lon region: (south, north, west, east) in degrees.
///
/// Construction guarantees `south <= north`. Wrapping at the antimeridian
/// is not modelled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBox {
    south: f64,
    north: f64,
    west: f64,
    east: f64,
}

impl GeoBox {
    /// Create a box, rejecting non-finite bounds or `south > north`.
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Option<Self> {
        let finite = [south, north, west, east].iter().all(|v| v.is_finite());
        if !finite || south > north {
            return None;
        }
        Some(Self {
            south,
            north,
            west,
            east,
        })
    }

    /// A square box of `half_width` degrees around a point.
    pub fn around(center: GeoPoint, half_width: f64) -> Option<Self> {
        let half = half_width.abs();
        Self::new(
            center.lat - half,
            center.lat + half,
            center.lon - half,
            center.lon + half,
        )
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    /// Midpoint of the box.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

impl Serialize for GeoBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.south, self.north, self.west, self.east].serialize(serializer)
    }
}

/// Which geocoding result the resolver produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Latitude/longitude of the top candidate.
    #[default]
    Point,
    /// Bounding box of the top candidate (synthesized when absent).
    Box,
}

impl ResolutionMode {
    /// Parse a mode from a string, falling back to `Point`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "box" | "bbox" => Self::Box,
            _ => Self::Point,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Box => "box",
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
