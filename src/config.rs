//! Configuration management for the resume ranker

use crate::error::{Result, RankerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Optional TOML skill catalog replacing the built-in one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    pub embedding: EmbeddingConfig,
    pub scoring: ScoringConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key_env: String,
    pub cache_path: PathBuf,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Model2Vec,
    OpenAi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub action_verb_multiplier: f64,
    pub experience_per_year: f64,
    pub section_bonus_lines: usize,
    pub section_bonus_factor: f64,
    pub semantic_scale: f64,
    pub strict_dimensions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub concurrency_limit: usize,
    pub failure_policy: FailurePolicy,
}

/// What happens to a run when one candidate fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// First error aborts the whole run
    Abort,
    /// Failed candidates are reported, the rest are still ranked
    Isolate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            action_verb_multiplier: 2.0,
            experience_per_year: 0.5,
            section_bonus_lines: 20,
            section_bonus_factor: 0.2,
            semantic_scale: 10.0,
            strict_dimensions: false,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 5,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let cache_path = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("embeddings.json");

        Self {
            catalog_path: None,
            embedding: EmbeddingConfig {
                provider: EmbeddingProvider::Model2Vec,
                model: "minishlab/potion-base-8M".to_string(),
                endpoint: "https://api.openai.com/v1".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                cache_path,
                timeout_secs: 30,
                max_retries: 2,
                retry_backoff_ms: 500,
            },
            scoring: ScoringConfig::default(),
            pipeline: PipelineConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                top_n: None,
            },
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| RankerError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.pipeline.concurrency_limit == 0 {
            return Err(RankerError::Configuration(
                "pipeline.concurrency_limit must be at least 1".to_string(),
            ));
        }
        if self.embedding.timeout_secs == 0 {
            return Err(RankerError::Configuration(
                "embedding.timeout_secs must be at least 1".to_string(),
            ));
        }
        let scoring = &self.scoring;
        let factors = [
            scoring.action_verb_multiplier,
            scoring.experience_per_year,
            scoring.section_bonus_factor,
            scoring.semantic_scale,
        ];
        if factors.iter().any(|f| !f.is_finite()) {
            return Err(RankerError::Configuration(
                "scoring factors must be finite numbers".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_scoring_rules() {
        let config = Config::default();
        assert_eq!(config.scoring.action_verb_multiplier, 2.0);
        assert_eq!(config.scoring.experience_per_year, 0.5);
        assert_eq!(config.scoring.section_bonus_lines, 20);
        assert_eq!(config.scoring.section_bonus_factor, 0.2);
        assert_eq!(config.scoring.semantic_scale, 10.0);
        assert_eq!(config.pipeline.concurrency_limit, 5);
        assert_eq!(config.pipeline.failure_policy, FailurePolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.embedding.provider, EmbeddingProvider::Model2Vec);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.embedding.model, config.embedding.model);
        assert_eq!(reloaded.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.pipeline.concurrency_limit = 0;
        config.save_to(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, RankerError::Configuration(_)));
    }
}
