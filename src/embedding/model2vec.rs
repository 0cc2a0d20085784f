//! Local embeddings with Model2Vec static models

use super::Embedder;
use crate::error::{Result, RankerError};
use anyhow::Context;
use async_trait::async_trait;
use log::info;
use model2vec_rs::model::StaticModel;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;

pub struct Model2VecEmbedder {
    model: Arc<StaticModel>,
    model_name: String,
}

/// Panicked or cancelled blocking task; never retried
fn blocking_failed(stage: &str, err: JoinError) -> RankerError {
    RankerError::TaskFailed(format!("{} task failed: {}", stage, err))
}

impl Model2VecEmbedder {
    /// Load a model from a local directory or a Hugging Face repo id
    pub async fn load(repo_or_path: &str) -> Result<Self> {
        let start_time = Instant::now();
        let source = repo_or_path.to_string();

        let model = tokio::task::spawn_blocking(move || {
            StaticModel::from_pretrained(&source, None, None, None)
                .with_context(|| format!("Failed to load model {}", source))
        })
        .await
        .map_err(|e| blocking_failed("Model loading", e))??;

        info!("Loaded Model2Vec model {} in {:.2?}", repo_or_path, start_time.elapsed());

        Ok(Self {
            model: Arc::new(model),
            model_name: repo_or_path.to_string(),
        })
    }
}

#[async_trait]
impl Embedder for Model2VecEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || model.encode_single(&text))
            .await
            .map_err(|e| blocking_failed("Encoding", e))
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicking_task_is_not_retryable() {
        let join_error = tokio::task::spawn_blocking(|| -> Vec<f32> { panic!("tokenizer exploded") })
            .await
            .unwrap_err();
        let err = blocking_failed("Encoding", join_error);
        assert!(matches!(err, RankerError::TaskFailed(ref m) if m.starts_with("Encoding task failed")));
        assert!(!err.is_retryable());
    }
}
