//! Per-line lexical scoring with a shared memo table

use crate::catalog::{RoleProfile, SkillCatalog};
use crate::config::ScoringConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineScore {
    pub total_score: f64,
    pub skill_score: f64,
    pub experience_score: f64,
    pub matched_skills: Vec<String>,
}

impl LineScore {
    pub fn zero() -> Self {
        Self {
            total_score: 0.0,
            skill_score: 0.0,
            experience_score: 0.0,
            matched_skills: Vec::new(),
        }
    }
}

/// Scores resume lines against a role's weighted skills.
///
/// Results are memoized per role and exact line text for the lifetime of the
/// scorer, so identical lines in different resumes are only scored once.
/// The table is never evicted.
pub struct LineScorer {
    catalog: Arc<SkillCatalog>,
    action_verb_multiplier: f64,
    experience_per_year: f64,
    years_regex: Regex,
    // role name -> line -> score
    cache: RwLock<HashMap<String, HashMap<String, LineScore>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl LineScorer {
    pub fn new(catalog: Arc<SkillCatalog>, scoring: &ScoringConfig) -> Self {
        let years_regex = Regex::new(r"(?i)(\d+)\+?\s*(?:years|yrs)")
            .expect("Invalid years regex");

        Self {
            catalog,
            action_verb_multiplier: scoring.action_verb_multiplier,
            experience_per_year: scoring.experience_per_year,
            years_regex,
            cache: RwLock::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn catalog(&self) -> &Arc<SkillCatalog> {
        &self.catalog
    }

    /// Score one line, returning the memoized result when this exact line
    /// was already scored for the same role.
    pub fn score_line(&self, line: &str, role: &RoleProfile) -> LineScore {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(score) = cache.get(role.name()).and_then(|lines| lines.get(line)) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return score.clone();
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let score = self.compute(line, role);

        // Concurrent first-writes compute the same value; last write wins
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(role.name().to_string())
            .or_default()
            .insert(line.to_string(), score.clone());

        score
    }

    fn compute(&self, line: &str, role: &RoleProfile) -> LineScore {
        let matched = role.matched_skills(line);

        let mut skill_score = 0.0;
        let mut matched_skills = Vec::with_capacity(matched.len());
        if !matched.is_empty() {
            let multiplier = if self.catalog.has_action_verb(line) {
                self.action_verb_multiplier
            } else {
                1.0
            };
            for (skill, weight) in matched {
                skill_score += f64::from(weight) * multiplier;
                matched_skills.push(skill.to_string());
            }
        }

        let experience_score = f64::from(self.detected_years(line)) * self.experience_per_year;

        LineScore {
            total_score: skill_score + experience_score,
            skill_score,
            experience_score,
            matched_skills,
        }
    }

    /// Leading number of the first "<n> years" / "<n>+ yrs" mention
    fn detected_years(&self, line: &str) -> u32 {
        self.years_regex
            .captures(line)
            .and_then(|cap| cap.get(1))
            // Absurdly long digit runs saturate instead of overflowing
            .map(|digits| digits.as_str().parse::<u32>().unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    pub fn cache_stats(&self) -> LineCacheStats {
        let entries = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(HashMap::len)
            .sum();
        LineCacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
