//! Resume ranker library
//!
//! Scores candidate resumes line by line against role skill profiles,
//! adds an embedding-similarity bonus against one or more job
//! descriptions and ranks candidates in bounded concurrent batches.

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod scoring;

pub use catalog::{RoleProfile, SkillCatalog};
pub use config::Config;
pub use embedding::{Embedder, EmbeddingCache};
pub use error::{Result, RankerError};
pub use pipeline::{CandidatePipeline, CandidateRecord, CandidateResult, RankingReport};
pub use scoring::{LineScore, LineScorer};
