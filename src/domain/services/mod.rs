mod privacy_noise;

pub use privacy_noise::{
    NoiseInjector, DEFAULT_NOISE_KM, KM_PER_DEGREE, MAX_NOISE_KM, MIN_COS_LATITUDE,
};
