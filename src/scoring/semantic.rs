//! Embedding similarity between a resume and job postings

use crate::error::{Result, RankerError};
use log::debug;

const EPSILON: f64 = 1e-8;

/// Cosine similarity over the first `min(a.len(), b.len())` components.
///
/// Mismatched lengths are truncated rather than rejected so that vectors
/// cached by older embedding models still compare; use
/// [`SemanticMatcher::strict`] to turn that into an error instead.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    dot / (norm_a * norm_b + EPSILON)
}

/// Turns resume/job similarities into a score contribution
#[derive(Debug, Clone, Copy)]
pub struct SemanticMatcher {
    scale: f64,
    strict: bool,
}

impl SemanticMatcher {
    pub fn new(scale: f64) -> Self {
        Self { scale, strict: false }
    }

    /// Reject vectors of different lengths instead of truncating
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sum (not mean) of `similarity * scale` over every job embedding, so
    /// the bonus grows with the number of postings compared against.
    pub fn semantic_bonus(&self, resume: &[f32], jobs: &[Vec<f32>]) -> Result<f64> {
        let mut bonus = 0.0;
        for job in jobs {
            if resume.len() != job.len() {
                if self.strict {
                    return Err(RankerError::DimensionMismatch(resume.len(), job.len()));
                }
                debug!(
                    "Truncating embeddings of different length ({} vs {})",
                    resume.len(),
                    job.len()
                );
            }
            bonus += cosine_similarity(resume, job) * self.scale;
        }
        Ok(bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_identical_vectors() {
        let v = [0.3, -1.2, 4.0, 0.5];
        assert!(approx(cosine_similarity(&v, &v), 1.0));
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert!(approx(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0));
        assert!(approx(cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]), -1.0));
    }

    #[test]
    fn test_bounds() {
        let samples: [&[f32]; 4] = [
            &[1.0, 2.0, 3.0],
            &[-4.0, 0.5, 2.0],
            &[0.001, 1000.0, -7.0],
            &[9.0, 9.0, 9.0],
        ];
        for a in samples {
            for b in samples {
                let sim = cosine_similarity(a, b);
                assert!((-1.0..=1.0).contains(&sim), "{} out of bounds", sim);
            }
        }
    }

    #[test]
    fn test_zero_vector_is_zero_not_nan() {
        let sim = cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_length_mismatch_truncates() {
        let sim = cosine_similarity(&[1.0, 0.0, 5.0], &[1.0, 0.0]);
        assert!(approx(sim, 1.0));
    }

    #[test]
    fn test_bonus_sums_over_jobs() {
        let matcher = SemanticMatcher::new(10.0);
        let resume = vec![1.0, 0.0];
        let one = matcher.semantic_bonus(&resume, &[vec![1.0, 0.0]]).unwrap();
        let three = matcher
            .semantic_bonus(&resume, &[vec![1.0, 0.0], vec![2.0, 0.0], vec![0.0, 1.0]])
            .unwrap();
        assert!(approx(one, 10.0));
        assert!(approx(three, 20.0));
        assert_eq!(matcher.semantic_bonus(&resume, &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_strict_mode_rejects_mismatch() {
        let matcher = SemanticMatcher::new(10.0).strict(true);
        let err = matcher.semantic_bonus(&[1.0, 2.0, 3.0], &[vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, RankerError::DimensionMismatch(3, 2)));
    }
}
