//! HTTP Inference Backend
//!
//! Implements InferenceBackend against a text-generation server exposing a
//! `/generate`-style endpoint (e.g. a seq2seq model behind TGI).

use crate::domain::ports::{InferenceBackend, InferenceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Inference client configuration.
#[derive(Debug, Clone)]
pub struct HttpInferenceConfig {
    /// Full URL of the generate endpoint
    pub url: String,
    /// Upper bound on generated tokens
    pub max_new_tokens: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HttpInferenceConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/generate".to_string(),
            max_new_tokens: 64,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

/// Servers answer with either one object or a one-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Single(Generated),
    Batch(Vec<Generated>),
}

/// Inference backend calling a remote text-generation server.
pub struct HttpInferenceBackend {
    config: HttpInferenceConfig,
    client: reqwest::Client,
}

impl HttpInferenceBackend {
    pub fn new(config: HttpInferenceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceBackend {
    async fn infer(&self, prompt: &str) -> Result<String, InferenceError> {
        let body = GenerateRequest {
            inputs: prompt,
            parameters: GenerateParameters {
                max_new_tokens: self.config.max_new_tokens,
            },
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Status(status.as_u16()));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Decode(e.to_string()))?;

        match generated {
            GenerateResponse::Single(g) => Ok(g.generated_text),
            GenerateResponse::Batch(batch) => batch
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| InferenceError::Decode("empty generation batch".to_string())),
        }
    }
}
