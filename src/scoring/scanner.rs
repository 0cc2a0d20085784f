//! Streaming resume scan: accumulates line scores and rebuilds the text

use crate::catalog::RoleProfile;
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::input::ResumeLines;
use crate::scoring::line_scorer::LineScorer;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub total_score: f64,
    /// Skills in line order; repeated across lines
    pub matched_skills: Vec<String>,
    /// Every line followed by a single space, for embedding
    pub full_text: String,
    pub lines_scanned: usize,
}

/// Early-section bonus settings
#[derive(Debug, Clone, Copy)]
pub struct SectionBonus {
    pub lines: usize,
    pub factor: f64,
}

impl SectionBonus {
    pub fn from_config(scoring: &ScoringConfig) -> Self {
        Self {
            lines: scoring.section_bonus_lines,
            factor: scoring.section_bonus_factor,
        }
    }

    /// Bonus for the 1-based line `index`
    pub fn for_line(&self, index: usize, skill_score: f64) -> f64 {
        if index <= self.lines {
            skill_score * self.factor
        } else {
            0.0
        }
    }
}

impl Default for SectionBonus {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

/// Consume `lines`, scoring each against `role`.
///
/// Skill mentions in the first `bonus.lines` lines earn an extra
/// `skill_score * bonus.factor`, rewarding a skills section near the top.
pub async fn scan_resume(
    lines: &mut ResumeLines,
    role: &RoleProfile,
    scorer: &LineScorer,
    bonus: SectionBonus,
) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome {
        total_score: 0.0,
        matched_skills: Vec::new(),
        full_text: String::new(),
        lines_scanned: 0,
    };

    while let Some(line) = lines.next_line().await? {
        outcome.lines_scanned += 1;
        outcome.full_text.push_str(&line);
        outcome.full_text.push(' ');

        let score = scorer.score_line(&line, role);
        let section_bonus = bonus.for_line(outcome.lines_scanned, score.skill_score);

        outcome.total_score += score.total_score + section_bonus;
        outcome.matched_skills.extend(score.matched_skills);
    }

    Ok(outcome)
}
