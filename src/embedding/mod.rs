//! Embedding providers, call policy and the persistent vector cache

pub mod cache;
pub mod model2vec;
pub mod openai;

pub use cache::{CacheStats, EmbeddingCache};

use crate::config::{EmbeddingConfig, EmbeddingProvider};
use crate::error::{Result, RankerError};
use async_trait::async_trait;
use log::warn;
use std::sync::Arc;
use std::time::Duration;

/// External text → vector capability
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Model identifier, for logs and reports
    fn name(&self) -> &str;
}

/// Timeout and retry rules applied to every embedder call
#[derive(Debug, Clone, Copy)]
pub struct CallPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 0,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl CallPolicy {
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            timeout: config.timeout(),
            max_retries: config.max_retries,
            initial_backoff: config.retry_backoff(),
        }
    }

    /// Call `embedder` with a per-attempt timeout, retrying retryable
    /// failures with exponential backoff (1x, 2x, 4x, ...).
    pub async fn call(&self, embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>> {
        let mut attempt = 0;
        loop {
            let outcome = match tokio::time::timeout(self.timeout, embedder.embed(text)).await {
                Ok(result) => result,
                Err(_) => Err(RankerError::EmbeddingTimeout(self.timeout)),
            };

            match outcome {
                Ok(vector) => return Ok(vector),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.initial_backoff.saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(
                        "Embedding call attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Build the embedder selected in the configuration
pub async fn from_config(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.provider {
        EmbeddingProvider::Model2Vec => {
            let embedder = model2vec::Model2VecEmbedder::load(&config.model).await?;
            Ok(Arc::new(embedder))
        }
        EmbeddingProvider::OpenAi => {
            let embedder = openai::OpenAiEmbedder::from_config(config)?;
            Ok(Arc::new(embedder))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        failures_left: AtomicU32,
        calls: AtomicU32,
        error: fn() -> RankerError,
    }

    #[async_trait]
    impl Embedder for Flaky {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err((self.error)());
            }
            Ok(vec![1.0, 2.0])
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    struct Stuck;

    #[async_trait]
    impl Embedder for Stuck {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "stuck"
        }
    }

    fn policy(max_retries: u32) -> CallPolicy {
        CallPolicy {
            timeout: Duration::from_secs(5),
            max_retries,
            initial_backoff: Duration::from_millis(10),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_failures() {
        let flaky = Flaky {
            failures_left: AtomicU32::new(2),
            calls: AtomicU32::new(0),
            error: || RankerError::Network("connection reset".into()),
        };
        let vector = policy(2).call(&flaky, "text").await.unwrap();
        assert_eq!(vector, vec![1.0, 2.0]);
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let flaky = Flaky {
            failures_left: AtomicU32::new(5),
            calls: AtomicU32::new(0),
            error: || RankerError::Embedding("quota".into()),
        };
        assert!(policy(1).call(&flaky, "text").await.is_err());
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_fails_fast() {
        let flaky = Flaky {
            failures_left: AtomicU32::new(1),
            calls: AtomicU32::new(0),
            error: || RankerError::InvalidInput("empty".into()),
        };
        assert!(policy(3).call(&flaky, "text").await.is_err());
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_request_is_not_retried() {
        let flaky = Flaky {
            failures_left: AtomicU32::new(1),
            calls: AtomicU32::new(0),
            error: || RankerError::EmbeddingRejected("malformed response".into()),
        };
        let err = policy(3).call(&flaky, "text").await.unwrap_err();
        assert!(matches!(err, RankerError::EmbeddingRejected(_)));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subsecond_timeout_is_reported() {
        let policy = CallPolicy {
            timeout: Duration::from_millis(250),
            ..policy(0)
        };
        let err = policy.call(&Stuck, "text").await.unwrap_err();
        assert_eq!(err.to_string(), "Embedding call timed out after 250ms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_reported() {
        let err = policy(0).call(&Stuck, "text").await.unwrap_err();
        assert!(matches!(err, RankerError::EmbeddingTimeout(d) if d == Duration::from_secs(5)));
    }
}
