use crate::domain::value_objects::ResolutionMode;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // HTTP front end
    pub listen_addr: String,
    pub debug: bool,

    // Resolution settings
    pub mode: ResolutionMode,
    pub point_cache_path: String,
    pub box_cache_path: String,
    pub box_half_width_deg: f64,
    pub noise_km: f64,

    // Geocoding provider
    pub geocoder_url: String,
    pub user_agent: String,
    pub geocode_interval_ms: u64,

    // Inference backend
    pub inference_url: String,
    pub inference_max_tokens: u32,

    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            debug: false,
            mode: ResolutionMode::Point,
            point_cache_path: "geocache.csv".to_string(),
            box_cache_path: "geobox_cache.csv".to_string(),
            box_half_width_deg: 0.01,
            noise_km: 25.0,
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "location-extraction-api/1.0".to_string(),
            geocode_interval_ms: 1000,
            inference_url: "http://127.0.0.1:8080/generate".to_string(),
            inference_max_tokens: 64,
            http_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Cache file used by the configured mode.
    pub fn cache_path(&self) -> &str {
        match self.mode {
            ResolutionMode::Point => &self.point_cache_path,
            ResolutionMode::Box => &self.box_cache_path,
        }
    }

    pub fn geocode_interval(&self) -> Duration {
        Duration::from_millis(self.geocode_interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let listen_addr = std::env::var("LOCRES_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:5000".to_string());

    let debug = std::env::var("DEBUG").is_ok();

    let mode = std::env::var("LOCRES_MODE")
        .map(|v| ResolutionMode::from_str(&v))
        .unwrap_or_default();

    let point_cache_path = std::env::var("LOCRES_POINT_CACHE_PATH")
        .unwrap_or_else(|_| "geocache.csv".to_string());

    let box_cache_path = std::env::var("LOCRES_BOX_CACHE_PATH")
        .unwrap_or_else(|_| "geobox_cache.csv".to_string());

    // Non-finite degrees or kilometres are treated as parse failures
    let box_half_width_deg = std::env::var("LOCRES_BOX_HALF_WIDTH_DEG")
        .unwrap_or_else(|_| "0.01".to_string())
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.01);

    let noise_km = std::env::var("LOCRES_NOISE_KM")
        .unwrap_or_else(|_| "25".to_string())
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(25.0);

    // Geocoding provider
    let geocoder_url = std::env::var("LOCRES_GEOCODER_URL")
        .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

    let user_agent = std::env::var("LOCRES_USER_AGENT")
        .unwrap_or_else(|_| "location-extraction-api/1.0".to_string());

    let geocode_interval_ms = std::env::var("LOCRES_GEOCODE_INTERVAL_MS")
        .unwrap_or_else(|_| "1000".to_string())
        .parse()
        .unwrap_or(1000);

    // Inference backend
    let inference_url = std::env::var("LOCRES_INFERENCE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8080/generate".to_string());

    let inference_max_tokens = std::env::var("LOCRES_INFERENCE_MAX_TOKENS")
        .unwrap_or_else(|_| "64".to_string())
        .parse()
        .unwrap_or(64);

    let http_timeout_secs = std::env::var("LOCRES_HTTP_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    Ok(Config {
        listen_addr,
        debug,
        mode,
        point_cache_path,
        box_cache_path,
        box_half_width_deg,
        noise_km,
        geocoder_url,
        user_agent,
        geocode_interval_ms,
        inference_url,
        inference_max_tokens,
        http_timeout_secs,
    })
}
