mod csv_geo_cache;
mod http_inference_backend;
mod nominatim_geocoder;

pub use csv_geo_cache::{CacheRecord, CsvGeoCache, KEY_COLUMN};
pub use http_inference_backend::{HttpInferenceBackend, HttpInferenceConfig};
pub use nominatim_geocoder::{NominatimConfig, NominatimGeocoder};
