//! Job-description keyword extraction and resume coverage

use super::words_from_text;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const STOPWORDS: &[&str] = &[
    "the", "of", "and", "to", "a", "in", "for", "is", "on", "that", "with", "as", "are", "by",
    "this", "from", "at", "it", "be", "or", "have", "has", "will", "include", "using",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub keywords: Vec<String>,
    pub found: Vec<String>,
    pub missing: Vec<String>,
    /// Share of keywords present in the resume, 0-100
    pub match_percent: u32,
}

/// Terms sorted by descending count; ties keep first-seen order
fn ranked<I: IntoIterator<Item = String>>(terms: I) -> Vec<String> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for term in terms {
        match index.get(&term) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(term.clone(), order.len());
                order.push((term, 1));
            }
        }
    }
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().map(|(term, _)| term).collect()
}

/// Most frequent unigrams (at least 5) topped up with frequent bigrams,
/// `limit` terms in total
pub fn top_keywords(text: &str, limit: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = words_from_text(&lowered)
        .into_iter()
        .filter(|w| w.chars().count() > 3 && !STOPWORDS.contains(w))
        .collect();

    let mut unigrams = ranked(words.iter().map(|w| w.to_string()));
    unigrams.truncate(5.max(limit.saturating_sub(5)));

    let mut bigrams = ranked(words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    bigrams.truncate(5.min(limit.saturating_sub(unigrams.len())));

    let mut combined = unigrams;
    combined.extend(bigrams);
    combined.truncate(limit);
    combined
}

/// How many of the job's top 25 keywords appear in the resume text
pub fn analyze_against_job(resume_text: &str, job_text: &str) -> KeywordReport {
    let resume = resume_text.to_lowercase();
    let keywords = top_keywords(job_text, 25);

    let (found, missing): (Vec<String>, Vec<String>) =
        keywords.iter().cloned().partition(|k| resume.contains(k.as_str()));

    let match_percent = if keywords.is_empty() {
        0
    } else {
        (found.len() as f64 / keywords.len() as f64 * 100.0).round() as u32
    };

    KeywordReport {
        keywords,
        found,
        missing,
        match_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_by_frequency_then_first_seen() {
        let keywords = top_keywords("rust tokio rust serde tokio rust axum", 3);
        assert_eq!(keywords, vec!["rust", "tokio", "serde"]);
    }

    #[test]
    fn test_short_and_stop_words_dropped() {
        let keywords = top_keywords("The API for Go is with using include", 10);
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_bigrams_fill_remaining_slots() {
        let text = "distributed systems distributed systems kubernetes";
        let keywords = top_keywords(text, 10);
        assert_eq!(
            keywords,
            vec![
                "distributed",
                "systems",
                "kubernetes",
                "distributed systems",
                "systems distributed",
                "systems kubernetes",
            ]
        );
    }

    #[test]
    fn test_analyze_against_job() {
        let job = "Senior engineer: React, TypeScript, GraphQL. React experience required.";
        let resume = "I build React and TypeScript frontends.";
        let report = analyze_against_job(resume, job);

        assert!(report.found.contains(&"react".to_string()));
        assert!(report.found.contains(&"typescript".to_string()));
        assert!(report.missing.contains(&"graphql".to_string()));
        assert_eq!(report.found.len() + report.missing.len(), report.keywords.len());
        let expected = (report.found.len() as f64 / report.keywords.len() as f64 * 100.0).round() as u32;
        assert_eq!(report.match_percent, expected);
    }

    #[test]
    fn test_empty_job_is_zero_percent() {
        let report = analyze_against_job("anything", "");
        assert_eq!(report.match_percent, 0);
        assert!(report.keywords.is_empty());
    }
}
