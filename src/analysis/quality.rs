//! Resume quality heuristics: structure, contact details, formatting and
//! likely misspellings

use super::words_from_text;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SAMPLE_CHARS: usize = 1000;
const LINES_PER_PAGE: usize = 60;

static PAGE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/Type\s*/Page").expect("Invalid page regex"));
static EXPERIENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)experience").expect("Invalid experience regex"));
static EDUCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)education").expect("Invalid education regex"));
static SKILLS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)skills").expect("Invalid skills regex"));
static EMAIL_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@[A-Za-z0-9.\-]+").expect("Invalid email regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{3,}").expect("Invalid whitespace regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// 0-100
    pub score: u8,
    pub improvements: Vec<String>,
    pub pages: usize,
    pub suspect_words: Vec<String>,
    pub sample_text: String,
}

/// Page count: `/Type /Page` markers for raw PDF data, else 60 lines a page
pub fn estimate_pages(text: &str) -> usize {
    if text.starts_with("%PDF") {
        PAGE_MARKER.find_iter(text).count().max(1)
    } else {
        let lines = text.split('\n').count();
        lines.div_ceil(LINES_PER_PAGE).max(1)
    }
}

fn has_char_run(word: &str, run: usize) -> bool {
    let chars: Vec<char> = word.chars().collect();
    chars.windows(run).any(|w| w.iter().all(|c| *c == w[0]))
}

/// Frequent words that look misspelled: very long, or a character
/// repeated three times in a row
fn suspect_words(text: &str) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for word in words_from_text(text) {
        let word = word.to_lowercase();
        match index.get(&word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word.clone(), counts.len());
                counts.push((word, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(100)
        .map(|(word, _)| word)
        .filter(|word| word.chars().count() > 18 || has_char_run(word, 3))
        .collect()
}

/// Score a resume out of 100, listing what to improve
pub fn check_resume_quality(text: &str) -> QualityReport {
    let pages = estimate_pages(text);
    let mut score: i32 = 100;
    let mut improvements = Vec::new();

    let mut deduct = |points: i32, advice: &str| {
        score -= points;
        improvements.push(advice.to_string());
    };

    if pages > 2 {
        deduct(20, "Consider reducing resume to 1-2 pages unless you have extensive experience.");
    }
    if !EXPERIENCE.is_match(text) {
        deduct(15, "Add an 'Experience' section with role, company and dates.");
    }
    if !EDUCATION.is_match(text) {
        deduct(10, "Add an 'Education' section.");
    }
    if !SKILLS.is_match(text) {
        deduct(10, "Add a 'Skills' or 'Technical Skills' section listing technologies.");
    }
    if !EMAIL_DOMAIN.is_match(text) {
        deduct(10, "Include a valid email address in contact details.");
    }
    if text.contains('\t') {
        deduct(5, "Avoid tab-delimited formatting; use consistent spacing or tables.");
    }
    if WHITESPACE_RUN.is_match(text) {
        deduct(5, "Remove excessive spaces; use consistent formatting.");
    }

    let suspects = suspect_words(text);
    if !suspects.is_empty() {
        let penalty = suspects.len().min(15) as i32;
        deduct(
            penalty,
            &format!(
                "Run a spell-check, some words may be misspelled: {}",
                suspects.iter().take(8).cloned().collect::<Vec<_>>().join(", ")
            ),
        );
    }

    QualityReport {
        score: score.clamp(0, 100) as u8,
        improvements,
        pages,
        suspect_words: suspects,
        sample_text: text.chars().take(SAMPLE_CHARS).collect(),
    }
}
