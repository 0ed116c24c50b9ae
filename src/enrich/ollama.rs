//! Ollama `/api/generate` client.
//!
//! One non-streaming POST per scenario. The connect timeout is set on the
//! client; the read timeout bounds sending the request and reading the
//! whole body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EnrichmentConfig;
use crate::error::EnrichError;

use super::Enricher;

/// Upper bound on the provider response body.
pub const MAX_RESPONSE_SIZE: usize = 1024 * 1024;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct SamplingOptions {
    temperature: f64,
    top_p: f64,
    top_k: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// [`Enricher`] backed by an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaEnricher {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    read_timeout: Duration,
}

impl OllamaEnricher {
    /// Creates a client from enrichment settings.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &EnrichmentConfig) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| EnrichError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            read_timeout: config.read_timeout,
        })
    }
}

#[async_trait]
impl Enricher for OllamaEnricher {
    async fn complete(&self, prompt: &str) -> Result<String, EnrichError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: SamplingOptions::default(),
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "sending generate request");

        let response = tokio::time::timeout(
            self.read_timeout,
            self.client.post(&self.endpoint).json(&request).send(),
        )
        .await
        .map_err(|_| EnrichError::Timeout)?
        .map_err(|e| {
            if e.is_timeout() {
                EnrichError::Timeout
            } else {
                EnrichError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::HttpStatus(status.as_u16()));
        }

        let bytes = tokio::time::timeout(self.read_timeout, response.bytes())
            .await
            .map_err(|_| EnrichError::Timeout)?
            .map_err(|e| EnrichError::Network(e.to_string()))?;

        if bytes.len() > MAX_RESPONSE_SIZE {
            return Err(EnrichError::InvalidResponse(format!(
                "response body exceeds {MAX_RESPONSE_SIZE} byte limit"
            )));
        }

        let body: GenerateResponse = serde_json::from_slice(&bytes)
            .map_err(|e| EnrichError::InvalidResponse(e.to_string()))?;

        debug!(bytes = bytes.len(), "generate response received");
        Ok(body.response)
    }
}
