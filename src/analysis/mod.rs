//! Local resume heuristics that need no embedding model: quality checks,
//! job-description keyword coverage and interview question templates.

pub mod keywords;
pub mod quality;
pub mod questions;

pub use keywords::{analyze_against_job, top_keywords, KeywordReport};
pub use quality::{check_resume_quality, QualityReport};
pub use questions::{generate_interview_questions, InterviewQuestion};

/// Split text into words of ASCII letters, digits and hyphens
pub fn words_from_text(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .filter(|word| !word.is_empty())
        .collect()
}
