//! Candidate ranking pipeline
//!
//! Job descriptions are embedded once, then candidates are scored in
//! consecutive batches of `concurrency_limit`: every candidate of a batch
//! runs concurrently, and the next batch starts only after the whole batch
//! has finished. The embedding cache is saved once at the end of the run.

pub mod candidate;

pub use candidate::{load_manifest, CandidateFailure, CandidateRecord, CandidateResult, RankingReport};

use crate::catalog::{RoleProfile, SkillCatalog};
use crate::config::{FailurePolicy, ScoringConfig};
use crate::embedding::EmbeddingCache;
use crate::error::{Result, RankerError};
use crate::input::InputManager;
use crate::scoring::{scan_resume, LineScorer, SectionBonus, SemanticMatcher};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

pub const DEFAULT_CONCURRENCY_LIMIT: usize = 5;

/// Scores and ranks candidates. Cheap to clone; clones share both caches.
#[derive(Clone)]
pub struct CandidatePipeline {
    catalog: Arc<SkillCatalog>,
    scorer: Arc<LineScorer>,
    cache: Arc<EmbeddingCache>,
    input: InputManager,
    bonus: SectionBonus,
    semantic: SemanticMatcher,
    failure_policy: FailurePolicy,
}

impl CandidatePipeline {
    pub fn new(scorer: Arc<LineScorer>, cache: Arc<EmbeddingCache>, scoring: &ScoringConfig) -> Self {
        Self {
            catalog: Arc::clone(scorer.catalog()),
            scorer,
            cache,
            input: InputManager::new(),
            bonus: SectionBonus::from_config(scoring),
            semantic: SemanticMatcher::new(scoring.semantic_scale).strict(scoring.strict_dimensions),
            failure_policy: FailurePolicy::Abort,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    pub fn scorer(&self) -> &LineScorer {
        &self.scorer
    }

    /// Score one candidate against precomputed job embeddings
    pub async fn process_resume(
        &self,
        candidate: &CandidateRecord,
        job_embeddings: &[Vec<f32>],
    ) -> Result<CandidateResult> {
        let fallback;
        let role = match self.catalog.role(&candidate.role) {
            Some(role) => role,
            None => {
                debug!(
                    "Role '{}' of candidate {} not in catalog, scoring without skills",
                    candidate.role, candidate.id
                );
                fallback = RoleProfile::empty(&candidate.role);
                &fallback
            }
        };

        let mut lines = self.input.open_lines(&candidate.resume_file_path).await?;
        let scan = scan_resume(&mut lines, role, &self.scorer, self.bonus).await?;

        let resume_embedding = self
            .cache
            .get_embedding(&scan.full_text, &format!("resume-{}", candidate.id))
            .await?;
        let semantic_score = self.semantic.semantic_bonus(&resume_embedding, job_embeddings)?;

        let matched_skills: BTreeSet<String> = scan.matched_skills.into_iter().collect();
        let cluster_scores = self.catalog.cluster_scores(&matched_skills);

        debug!(
            "Candidate {} scored lexical={:.2} semantic={:.2} over {} lines",
            candidate.id, scan.total_score, semantic_score, scan.lines_scanned
        );

        Ok(CandidateResult {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            total_score: scan.total_score + semantic_score,
            lexical_score: scan.total_score,
            semantic_score,
            matched_skills,
            cluster_scores,
            resume_file_path: candidate.resume_file_path.clone(),
        })
    }

    /// Rank every candidate, highest `total_score` first. The first failure
    /// aborts the run regardless of the configured policy.
    pub async fn process_all_candidates(
        &self,
        candidates: &[CandidateRecord],
        job_descriptions: &[String],
        concurrency_limit: usize,
    ) -> Result<Vec<CandidateResult>> {
        let report = self
            .run(candidates, job_descriptions, concurrency_limit, FailurePolicy::Abort)
            .await?;
        Ok(report.results)
    }

    /// Rank every candidate under the configured failure policy
    pub async fn rank_candidates(
        &self,
        candidates: &[CandidateRecord],
        job_descriptions: &[String],
        concurrency_limit: usize,
    ) -> Result<RankingReport> {
        self.run(candidates, job_descriptions, concurrency_limit, self.failure_policy)
            .await
    }

    async fn run(
        &self,
        candidates: &[CandidateRecord],
        job_descriptions: &[String],
        concurrency_limit: usize,
        policy: FailurePolicy,
    ) -> Result<RankingReport> {
        if concurrency_limit == 0 {
            return Err(RankerError::InvalidInput(
                "concurrency limit must be at least 1".to_string(),
            ));
        }
        let start_time = Instant::now();

        // Sequential: job postings are few and shared by every candidate
        let mut job_embeddings = Vec::with_capacity(job_descriptions.len());
        for (index, description) in job_descriptions.iter().enumerate() {
            let embedding = self
                .cache
                .get_embedding(description, &format!("job-{}", index))
                .await?;
            job_embeddings.push(embedding);
        }
        let job_embeddings = Arc::new(job_embeddings);

        info!(
            "Ranking {} candidates against {} job descriptions ({} at a time)",
            candidates.len(),
            job_descriptions.len(),
            concurrency_limit
        );

        let mut results = Vec::with_capacity(candidates.len());
        let mut failures = Vec::new();

        for (batch_index, batch) in candidates.chunks(concurrency_limit).enumerate() {
            debug!("Starting batch {} ({} candidates)", batch_index, batch.len());

            let mut tasks = JoinSet::new();
            for (slot, candidate) in batch.iter().cloned().enumerate() {
                let pipeline = self.clone();
                let jobs = Arc::clone(&job_embeddings);
                tasks.spawn(async move {
                    let outcome = pipeline.process_resume(&candidate, &jobs).await;
                    (slot, candidate, outcome)
                });
            }

            // Keep submission order inside the batch so equal scores rank reproducibly
            let mut batch_results: Vec<Option<CandidateResult>> = vec![None; batch.len()];
            while let Some(joined) = tasks.join_next().await {
                let (slot, candidate, outcome) =
                    joined.map_err(|e| RankerError::TaskFailed(e.to_string()))?;
                match outcome {
                    Ok(result) => batch_results[slot] = Some(result),
                    Err(e) if policy == FailurePolicy::Isolate => {
                        warn!("Candidate {} ({}) failed: {}", candidate.id, candidate.name, e);
                        failures.push(CandidateFailure {
                            id: candidate.id,
                            name: candidate.name,
                            error: e.to_string(),
                        });
                    }
                    // Dropping the JoinSet cancels the rest of the batch
                    Err(e) => return Err(e),
                }
            }
            results.extend(batch_results.into_iter().flatten());
        }

        self.cache.save()?;

        results.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Ranked {} candidates ({} failed) in {}ms",
            results.len(),
            failures.len(),
            elapsed_ms
        );

        Ok(RankingReport {
            results,
            failures,
            job_count: job_descriptions.len(),
            embedding_model: self.cache.embedder_name().to_string(),
            generated_at: chrono::Utc::now(),
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSpec;
    use crate::embedding::{CallPolicy, Embedder};
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Embeds "frontend"-flavoured text along x and everything else along y
    struct AxisEmbedder;

    #[async_trait]
    impl Embedder for AxisEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.to_lowercase().contains("react") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0])
            }
        }

        fn name(&self) -> &str {
            "axis"
        }
    }

    /// Fails with a quota error on any text mentioning "boom"
    struct QuotaEmbedder;

    #[async_trait]
    impl Embedder for QuotaEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("boom") {
                Err(RankerError::Embedding("quota".into()))
            } else {
                Ok(vec![1.0, 0.0])
            }
        }

        fn name(&self) -> &str {
            "quota"
        }
    }

    fn pipeline() -> CandidatePipeline {
        pipeline_with(Arc::new(AxisEmbedder))
    }

    fn pipeline_with(embedder: Arc<dyn Embedder>) -> CandidatePipeline {
        let mut spec = CatalogSpec::default();
        spec.action_verbs = vec!["built".into()];
        spec.roles.insert(
            "Frontend".into(),
            [("React".to_string(), 5u8), ("TypeScript".to_string(), 3u8)].into_iter().collect(),
        );
        spec.clusters.insert("Frontend".into(), vec!["React".into(), "TypeScript".into()]);
        spec.clusters.insert("Backend".into(), vec!["Node.js".into()]);

        let catalog = Arc::new(SkillCatalog::from_spec(spec).unwrap());
        let scoring = ScoringConfig::default();
        let scorer = Arc::new(LineScorer::new(catalog, &scoring));
        let cache = Arc::new(EmbeddingCache::in_memory(embedder, CallPolicy::default()));
        CandidatePipeline::new(scorer, cache, &scoring)
    }

    fn candidate(dir: &TempDir, id: &str, role: &str, resume: &str) -> CandidateRecord {
        let path = dir.path().join(format!("{}.txt", id));
        std::fs::write(&path, resume).unwrap();
        CandidateRecord {
            id: id.to_string(),
            name: format!("Candidate {}", id),
            role: role.to_string(),
            resume_file_path: path,
        }
    }

    #[tokio::test]
    async fn test_process_resume_combines_scores() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline();
        let record = candidate(&dir, "1", "Frontend", "Built React apps\nTypeScript");

        let result = pipeline
            .process_resume(&record, &[vec![1.0, 0.0], vec![1.0, 0.0]])
            .await
            .unwrap();

        // (10 * 1.2) + (3 * 1.2) lexical, two identical jobs at similarity 1
        assert!((result.lexical_score - 15.6).abs() < 1e-9);
        assert!((result.semantic_score - 20.0).abs() < 1e-6);
        assert!((result.total_score - 35.6).abs() < 1e-6);
        assert_eq!(result.cluster_scores.get("Frontend"), Some(&2));
        assert_eq!(result.cluster_scores.get("Backend"), Some(&0));
        assert!(pipeline.cache().get("resume-1").is_some());
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected() {
        let err = pipeline().process_all_candidates(&[], &[], 0).await.unwrap_err();
        assert!(matches!(err, RankerError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_resume_aborts_by_default() {
        let dir = TempDir::new().unwrap();
        let mut missing = candidate(&dir, "2", "Frontend", "React");
        missing.resume_file_path = dir.path().join("gone.txt");
        let present = candidate(&dir, "1", "Frontend", "React");

        let err = pipeline()
            .process_all_candidates(&[present, missing], &["React role".to_string()], 5)
            .await
            .unwrap_err();
        assert!(matches!(err, RankerError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_isolate_policy_reports_failures() {
        let dir = TempDir::new().unwrap();
        let mut missing = candidate(&dir, "2", "Frontend", "React");
        missing.resume_file_path = dir.path().join("gone.txt");
        let present = candidate(&dir, "1", "Frontend", "React");

        let report = pipeline()
            .with_failure_policy(FailurePolicy::Isolate)
            .rank_candidates(&[present, missing], &["React role".to_string()], 5)
            .await
            .unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].id, "2");
        assert_eq!(report.embedding_model, "axis");
    }

    #[tokio::test]
    async fn test_empty_candidate_list() {
        let results = pipeline()
            .process_all_candidates(&[], &["React role".to_string()], 3)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_resume_embedding_failure_aborts_by_default() {
        let dir = TempDir::new().unwrap();
        let candidates = vec![
            candidate(&dir, "0", "Frontend", "React"),
            candidate(&dir, "1", "Frontend", "React boom"),
            candidate(&dir, "2", "Frontend", "TypeScript"),
        ];

        let err = pipeline_with(Arc::new(QuotaEmbedder))
            .process_all_candidates(&candidates, &["React role".to_string()], 2)
            .await
            .unwrap_err();
        assert!(matches!(err, RankerError::Embedding(ref m) if m == "quota"));
    }

    #[tokio::test]
    async fn test_resume_embedding_failure_isolated() {
        let dir = TempDir::new().unwrap();
        let candidates = vec![
            candidate(&dir, "0", "Frontend", "React"),
            candidate(&dir, "1", "Frontend", "React boom"),
            candidate(&dir, "2", "Frontend", "TypeScript"),
        ];

        let report = pipeline_with(Arc::new(QuotaEmbedder))
            .with_failure_policy(FailurePolicy::Isolate)
            .rank_candidates(&candidates, &["React role".to_string()], 2)
            .await
            .unwrap();

        let ids: Vec<&str> = report.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "2"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].id, "1");
        assert_eq!(report.failures[0].error, "Embedding generation error: quota");
    }

    #[tokio::test]
    async fn test_job_embedding_failure_aborts_even_when_isolating() {
        let dir = TempDir::new().unwrap();
        let candidates = vec![candidate(&dir, "0", "Frontend", "React")];

        let err = pipeline_with(Arc::new(QuotaEmbedder))
            .with_failure_policy(FailurePolicy::Isolate)
            .rank_candidates(&candidates, &["boom role".to_string()], 2)
            .await
            .unwrap_err();
        assert!(matches!(err, RankerError::Embedding(ref m) if m == "quota"));
    }
}
