//! Privacy Noise Service
//!
//! Perturbs a resolved point so that published coordinates do not reveal
//! the exact geocoded location. Pure domain logic apart from the RNG.

use crate::domain::value_objects::GeoPoint;
use rand::Rng;
use std::f64::consts::TAU;

/// Kilometres per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Default perturbation radius in kilometres.
pub const DEFAULT_NOISE_KM: f64 = 25.0;

/// Smallest |cos(latitude)| used for the longitude correction.
///
/// Bounds the longitude delta near the poles (about 89.4 degrees).
pub const MIN_COS_LATITUDE: f64 = 0.01;

/// Largest perturbation radius honoured: half the Earth's circumference.
pub const MAX_NOISE_KM: f64 = 20_037.5;

/// Random displacement of points within a bounded radius.
///
/// The radius is drawn uniformly in `[0, max_km]`, so displaced points
/// cluster towards the centre rather than being uniform over the disk.
pub struct NoiseInjector;

impl NoiseInjector {
    /// Perturb a point using the thread-local RNG.
    ///
    /// An absent point stays absent: noise is never invented for a
    /// missing location.
    pub fn perturb(point: Option<GeoPoint>, max_km: f64) -> Option<GeoPoint> {
        Self::perturb_with(&mut rand::thread_rng(), point, max_km)
    }

    /// Perturb a point with a caller-supplied RNG.
    ///
    /// # Arguments
    /// * `rng` - Randomness source
    /// * `point` - Point to displace, if any
    /// * `max_km` - Maximum displacement; non-positive or NaN means none,
    ///   larger values (including infinity) are capped at `MAX_NOISE_KM`
    ///
    /// # Returns
    /// The displaced point with latitude clamped to [-90, 90] and longitude
    /// wrapped into [-180, 180], or None if `point` was None
    pub fn perturb_with<R: Rng + ?Sized>(
        rng: &mut R,
        point: Option<GeoPoint>,
        max_km: f64,
    ) -> Option<GeoPoint> {
        let point = point?;

        let max_km = max_km.max(0.0).min(MAX_NOISE_KM);
        if max_km == 0.0 {
            return Some(point);
        }

        let max_deg = max_km / KM_PER_DEGREE;
        let angle = rng.gen_range(0.0..TAU);
        let radius = rng.gen_range(0.0..=max_deg);

        let cos_lat = point.lat.to_radians().cos();
        let cos_lat = if cos_lat.abs() < MIN_COS_LATITUDE {
            MIN_COS_LATITUDE.copysign(cos_lat)
        } else {
            cos_lat
        };

        let dlat = radius * angle.cos();
        let dlon = radius * angle.sin() / cos_lat;

        Some(GeoPoint::new(
            (point.lat + dlat).clamp(-90.0, 90.0),
            wrap_longitude(point.lon + dlon),
        ))
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
