//! Location Resolver - text to privacy-blurred coordinates
//!
//! This is the composition root that wires together all the components.

use location_resolver::adapters::inbound::ApiServer;
use location_resolver::adapters::outbound::{
    CsvGeoCache, HttpInferenceBackend, HttpInferenceConfig, NominatimConfig, NominatimGeocoder,
};
use location_resolver::config::load_config;
use location_resolver::domain::value_objects::{GeoBox, GeoPoint, ResolutionMode};
use location_resolver::{
    GeocodeResolver, LocationExtractor, RateLimitConfig, RateLimiter, ResolutionService,
    ResolverCache,
};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting location-resolver mode={} listen={}",
        cfg.mode,
        cfg.listen_addr
    );

    // ===== COMPOSITION ROOT =====
    // Wire up all adapters and services

    // 1. Create outbound adapters

    // Geocode cache (CSV); an unreadable cache file is fatal
    let cache = match cfg.mode {
        ResolutionMode::Point => {
            ResolverCache::Point(Arc::new(CsvGeoCache::<GeoPoint>::open(cfg.cache_path())?))
        }
        ResolutionMode::Box => {
            ResolverCache::Box(Arc::new(CsvGeoCache::<GeoBox>::open(cfg.cache_path())?))
        }
    };

    // Geocoding provider (Nominatim)
    let geocoder = Arc::new(NominatimGeocoder::new(NominatimConfig {
        base_url: cfg.geocoder_url.clone(),
        user_agent: cfg.user_agent.clone(),
        timeout: cfg.http_timeout(),
        ..Default::default()
    })?);

    // Inference backend (text-generation server)
    let inference = Arc::new(HttpInferenceBackend::new(HttpInferenceConfig {
        url: cfg.inference_url.clone(),
        max_new_tokens: cfg.inference_max_tokens,
        timeout: cfg.http_timeout(),
    })?);

    // One limiter for the whole process: the provider allows ~1 request/s
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
        min_interval: cfg.geocode_interval(),
    }));

    // 2. Create application service
    let resolver = GeocodeResolver::new(geocoder, cache, limiter)
        .with_box_half_width(cfg.box_half_width_deg);
    let service = Arc::new(
        ResolutionService::new(LocationExtractor::new(inference), resolver)
            .with_noise_km(cfg.noise_km),
    );

    tracing::info!("geocode cache ready with {} items", service.cache_size());

    // 3. Create inbound adapter and run
    let server = ApiServer::new(cfg.listen_addr.clone(), service);

    server.run().await
}
