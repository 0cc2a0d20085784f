//! Candidate records, results and manifest loading

use crate::error::{Result, RankerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(alias = "resumeFilePath", alias = "resume")]
    pub resume_file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub id: String,
    pub name: String,
    pub total_score: f64,
    pub lexical_score: f64,
    pub semantic_score: f64,
    pub matched_skills: BTreeSet<String>,
    pub cluster_scores: BTreeMap<String, usize>,
    pub resume_file_path: PathBuf,
}

/// A candidate that could not be scored under the isolate policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFailure {
    pub id: String,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    /// Sorted by `total_score`, highest first
    pub results: Vec<CandidateResult>,
    pub failures: Vec<CandidateFailure>,
    pub job_count: usize,
    pub embedding_model: String,
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Manifest {
    List(Vec<CandidateRecord>),
    Table { candidates: Vec<CandidateRecord> },
}

/// Load candidates from a JSON or TOML manifest.
///
/// JSON may be a bare array or `{"candidates": [...]}`; TOML uses
/// `[[candidates]]` tables. Relative resume paths are resolved against the
/// manifest's directory.
pub fn load_manifest(path: &Path) -> Result<Vec<CandidateRecord>> {
    let content = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let manifest: Manifest = if is_toml {
        toml::from_str(&content).map_err(|e| {
            RankerError::InvalidInput(format!("Invalid candidate manifest {}: {}", path.display(), e))
        })?
    } else {
        serde_json::from_str(&content)?
    };

    let mut candidates = match manifest {
        Manifest::List(list) => list,
        Manifest::Table { candidates } => candidates,
    };

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for candidate in &mut candidates {
        if candidate.resume_file_path.is_relative() {
            candidate.resume_file_path = base.join(&candidate.resume_file_path);
        }
    }

    let mut seen = BTreeSet::new();
    for candidate in &candidates {
        if !seen.insert(candidate.id.as_str()) {
            return Err(RankerError::InvalidInput(format!(
                "Duplicate candidate id '{}' in {}",
                candidate.id,
                path.display()
            )));
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_json_array_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("candidates.json");
        std::fs::write(
            &path,
            r#"[{"id": "7", "name": "Ada", "role": "Backend Engineer", "resumeFilePath": "cv/ada.txt"}]"#,
        )
        .unwrap();

        let candidates = load_manifest(&path).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].resume_file_path, dir.path().join("cv/ada.txt"));
    }

    #[test]
    fn test_toml_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("candidates.toml");
        std::fs::write(
            &path,
            r#"
[[candidates]]
id = "1"
name = "Grace"
role = "Frontend Engineer"
resume_file_path = "/srv/resumes/grace.pdf"

[[candidates]]
id = "2"
name = "Linus"
role = "DevOps Engineer"
resume = "linus.md"
"#,
        )
        .unwrap();

        let candidates = load_manifest(&path).unwrap();
        assert_eq!(candidates[0].resume_file_path, PathBuf::from("/srv/resumes/grace.pdf"));
        assert_eq!(candidates[1].resume_file_path, dir.path().join("linus.md"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("candidates.json");
        std::fs::write(
            &path,
            r#"{"candidates": [
                {"id": "1", "name": "A", "role": "x", "resume_file_path": "a.txt"},
                {"id": "1", "name": "B", "role": "x", "resume_file_path": "b.txt"}
            ]}"#,
        )
        .unwrap();

        assert!(matches!(load_manifest(&path), Err(RankerError::InvalidInput(_))));
    }
}
