//! Inference Backend Port
//!
//! Defines the interface for the text-to-text model used by the extractor.

use async_trait::async_trait;

/// Failure of the inference backend itself.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference request failed: {0}")]
    Transport(String),
    #[error("inference backend returned status {0}")]
    Status(u16),
    #[error("malformed inference response: {0}")]
    Decode(String),
}

/// Black-box text generation: prompt in, raw text out.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceError>;
}
