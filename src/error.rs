//! Error handling for the resume ranker

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resume extraction failed: {0}")]
    Extraction(String),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    /// Provider refused the request or answered with an unusable body
    #[error("Embedding request rejected: {0}")]
    EmbeddingRejected(String),

    #[error("Embedding call timed out after {0:?}")]
    EmbeddingTimeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Embedding cache corrupted: {0}")]
    CacheCorruption(String),

    #[error("Embedding dimensions don't match: {0} vs {1}")]
    DimensionMismatch(usize, usize),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Candidate task failed: {0}")]
    TaskFailed(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl RankerError {
    /// Whether a failed embedding call is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RankerError::Embedding(_) | RankerError::EmbeddingTimeout(_) | RankerError::Network(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RankerError>;

/// Convert anyhow errors (model2vec surfaces these) to our error type,
/// keeping the whole context chain in the message
impl From<anyhow::Error> for RankerError {
    fn from(err: anyhow::Error) -> Self {
        RankerError::Embedding(format!("{:#}", err))
    }
}

impl From<reqwest::Error> for RankerError {
    fn from(err: reqwest::Error) -> Self {
        RankerError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(RankerError::Embedding("quota".into()).is_retryable());
        assert!(RankerError::EmbeddingTimeout(Duration::from_secs(30)).is_retryable());
        assert!(!RankerError::EmbeddingRejected("malformed body".into()).is_retryable());
        assert!(!RankerError::TaskFailed("panicked".into()).is_retryable());
        assert!(RankerError::Network("reset".into()).is_retryable());
        assert!(!RankerError::Extraction("missing".into()).is_retryable());
        assert!(!RankerError::DimensionMismatch(3, 4).is_retryable());
    }

    #[test]
    fn test_anyhow_context_is_kept() {
        use anyhow::Context;
        let failed: anyhow::Result<()> = Err(anyhow::anyhow!("404 Not Found"));
        let err: RankerError = failed.context("Failed to load model org/missing").unwrap_err().into();
        match err {
            RankerError::Embedding(message) => {
                assert!(message.contains("org/missing"));
                assert!(message.contains("404 Not Found"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_timeout_message_keeps_subsecond_precision() {
        let err = RankerError::EmbeddingTimeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Embedding call timed out after 250ms");
    }
}
