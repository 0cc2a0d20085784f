//! OpenAI-compatible `/embeddings` HTTP endpoint

use super::Embedder;
use crate::config::EmbeddingConfig;
use crate::error::{Result, RankerError};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiEmbedder {
    pub fn new(endpoint: &str, model: &str, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| RankerError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    /// API key is read from the environment variable named in the config
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            RankerError::Configuration(format!("Environment variable {} is not set", config.api_key_env))
        })?;
        Self::new(&config.endpoint, &config.model, api_key)
    }

    fn url(&self) -> String {
        format!("{}/embeddings", self.endpoint)
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            // Rate limits and server errors are worth retrying, the rest are not
            return Err(if status.as_u16() == 429 || status.is_server_error() {
                RankerError::Embedding(format!("{}: {}", status, message))
            } else {
                RankerError::EmbeddingRejected(format!("{}: {}", status, message))
            });
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                RankerError::EmbeddingRejected(format!("Malformed embedding response: {}", e))
            } else {
                RankerError::from(e)
            }
        })?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| RankerError::EmbeddingRejected("Response contained no embedding".to_string()))?;

        debug!("Embedded {} chars into {} dimensions", text.len(), vector.len());
        Ok(vector)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
