//! Geocode Resolver
//!
//! Resolves canonical place-names to coordinates or bounding boxes:
//! cache first, then one rate-limited provider call, then cache store.

use crate::domain::entities::{GeocodeCandidate, Geocoded};
use crate::domain::ports::{CacheError, GeoCache, GeocodingProvider};
use crate::domain::value_objects::{GeoBox, GeoPoint, ResolutionMode};
use crate::infrastructure::RateLimiter;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Default half-width of a synthesized bounding box, in degrees.
pub const DEFAULT_BOX_HALF_WIDTH: f64 = 0.01;

/// The cache backing the resolver. Its variant selects the resolution mode.
#[derive(Clone)]
pub enum ResolverCache {
    Point(Arc<dyn GeoCache<GeoPoint>>),
    Box(Arc<dyn GeoCache<GeoBox>>),
}

impl ResolverCache {
    pub fn mode(&self) -> ResolutionMode {
        match self {
            Self::Point(_) => ResolutionMode::Point,
            Self::Box(_) => ResolutionMode::Box,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Point(c) => c.len(),
            Self::Box(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, place: &str) -> Option<Geocoded> {
        match self {
            Self::Point(c) => c.lookup(place).map(Geocoded::Point),
            Self::Box(c) => c.lookup(place).map(Geocoded::Box),
        }
    }

    /// Shape a provider candidate for this mode and persist it.
    fn store_candidate(
        &self,
        place: &str,
        candidate: &GeocodeCandidate,
        box_half_width: f64,
    ) -> Result<Option<Geocoded>, CacheError> {
        match self {
            Self::Point(c) => {
                c.store(place, candidate.point)?;
                Ok(Some(Geocoded::Point(candidate.point)))
            }
            Self::Box(c) => {
                let bbox = candidate
                    .bounding_box
                    .or_else(|| GeoBox::around(candidate.point, box_half_width));
                match bbox {
                    Some(b) => {
                        c.store(place, b)?;
                        Ok(Some(Geocoded::Box(b)))
                    }
                    None => Ok(None),
                }
            }
        }
    }
}

/// Resolves place-names through the cache and the geocoding provider.
///
/// Geocoding failures are an expected steady-state condition: they are
/// logged and reported as `Ok(None)`. Only cache failures are errors.
pub struct GeocodeResolver {
    provider: Arc<dyn GeocodingProvider>,
    cache: ResolverCache,
    limiter: Arc<RateLimiter>,
    box_half_width: f64,
    /// Per-place locks so concurrent misses issue a single provider call
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl GeocodeResolver {
    /// Create a new resolver.
    pub fn new(
        provider: Arc<dyn GeocodingProvider>,
        cache: ResolverCache,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            provider,
            cache,
            limiter,
            box_half_width: DEFAULT_BOX_HALF_WIDTH,
            inflight: DashMap::new(),
        }
    }

    /// Set the half-width used when the provider omits a bounding box.
    pub fn with_box_half_width(mut self, half_width: f64) -> Self {
        self.box_half_width = half_width;
        self
    }

    pub fn mode(&self) -> ResolutionMode {
        self.cache.mode()
    }

    /// Number of cached places.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a canonical place-name.
    ///
    /// # Returns
    /// * `Ok(Some(_))` - from cache, or freshly geocoded and stored
    /// * `Ok(None)` - the provider had no usable candidate or failed
    /// * `Err(_)` - the result could not be written to the cache
    pub async fn resolve(&self, place: &str) -> Result<Option<Geocoded>, CacheError> {
        if let Some(hit) = self.cache.lookup(place) {
            tracing::debug!("cache hit for {:?}", place);
            return Ok(Some(hit));
        }

        let lock = self
            .inflight
            .entry(place.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;

            // Another request may have resolved it while we waited
            match self.cache.lookup(place) {
                Some(hit) => {
                    tracing::debug!("cache hit for {:?} after wait", place);
                    Ok(Some(hit))
                }
                None => self.fetch_and_store(place).await,
            }
        };

        // Only the map holds the lock now: nobody else is waiting
        drop(lock);
        self.inflight
            .remove_if(place, |_, l| Arc::strong_count(l) == 1);

        result
    }

    async fn fetch_and_store(&self, place: &str) -> Result<Option<Geocoded>, CacheError> {
        self.limiter.acquire().await;

        let candidate = match self.provider.geocode(place).await {
            Ok(Some(candidate)) => candidate,
            Ok(None) => {
                tracing::warn!("no geocoding result for {:?}", place);
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!("geocoding failed for {:?}: {}", place, e);
                return Ok(None);
            }
        };

        match self
            .cache
            .store_candidate(place, &candidate, self.box_half_width)
        {
            Ok(Some(resolved)) => {
                tracing::info!(
                    "cache stored {:?} -> {:?} ({})",
                    place,
                    resolved,
                    candidate.display_name.as_deref().unwrap_or("unnamed")
                );
                Ok(Some(resolved))
            }
            Ok(None) => {
                tracing::warn!("unusable geocoding result for {:?}", place);
                Ok(None)
            }
            Err(e) => {
                tracing::error!("cache store failed for {:?}: {}", place, e);
                Err(e)
            }
        }
    }
}
