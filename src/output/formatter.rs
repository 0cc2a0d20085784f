//! Ranking report formatters

use crate::config::OutputFormat;
use crate::error::{Result, RankerError};
use crate::pipeline::RankingReport;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering a ranking report
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal table
pub struct ConsoleFormatter {
    use_colors: bool,
    top_n: Option<usize>,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    top_n: Option<usize>,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, top_n: Option<usize>) -> Self {
        Self { use_colors, top_n }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".color(Color::Blue).bold(), title.color(Color::Blue).bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }

    fn rank_color(rank: usize) -> Color {
        match rank {
            1 => Color::Green,
            2 | 3 => Color::BrightGreen,
            _ => Color::White,
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("CANDIDATE RANKING"));
        output.push_str(&format!(
            "Generated: {} | {} candidates | {} job descriptions | model: {} | {}ms\n\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.results.len() + report.failures.len(),
            report.job_count,
            report.embedding_model,
            report.elapsed_ms
        ));

        output.push_str(&format!(
            "{:>4}  {:<24} {:>9} {:>9} {:>9}  {}\n",
            "#", "Candidate", "Total", "Lexical", "Semantic", "Skills"
        ));

        let shown = self.top_n.unwrap_or(report.results.len());
        for (i, result) in report.results.iter().take(shown).enumerate() {
            let rank = i + 1;
            let skills = result.matched_skills.iter().cloned().collect::<Vec<_>>().join(", ");
            let line = format!(
                "{:>4}  {:<24} {:>9.2} {:>9.2} {:>9.2}  {}",
                rank,
                truncate(&format!("{} ({})", result.name, result.id), 24),
                result.total_score,
                result.lexical_score,
                result.semantic_score,
                skills
            );
            output.push_str(&self.colorize(&line, Self::rank_color(rank)));
            output.push('\n');

            let clusters: Vec<String> = result
                .cluster_scores
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(cluster, count)| format!("{} {}", cluster, count))
                .collect();
            if !clusters.is_empty() {
                output.push_str(&format!("{:>6}{}\n", "", clusters.join(" | ")));
            }
        }
        if shown < report.results.len() {
            output.push_str(&format!("  ... and {} more\n", report.results.len() - shown));
        }

        if !report.failures.is_empty() {
            output.push_str(&self.format_header("FAILED CANDIDATES"));
            for failure in &report.failures {
                output.push_str(&self.colorize(
                    &format!("  {} ({}): {}\n", failure.name, failure.id, failure.error),
                    Color::Red,
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(top_n: Option<usize>) -> Self {
        Self { top_n }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();
        output.push_str("# Candidate Ranking\n\n");
        output.push_str(&format!(
            "_Generated {} with `{}` against {} job description(s)._\n\n",
            report.generated_at.format("%Y-%m-%d %H:%M UTC"),
            report.embedding_model,
            report.job_count
        ));

        output.push_str("| # | Candidate | Total | Lexical | Semantic | Matched skills |\n");
        output.push_str("|---|---|---:|---:|---:|---|\n");
        let shown = self.top_n.unwrap_or(report.results.len());
        for (i, result) in report.results.iter().take(shown).enumerate() {
            output.push_str(&format!(
                "| {} | {} ({}) | {:.2} | {:.2} | {:.2} | {} |\n",
                i + 1,
                escape_cell(&result.name),
                escape_cell(&result.id),
                result.total_score,
                result.lexical_score,
                result.semantic_score,
                escape_cell(&result.matched_skills.iter().cloned().collect::<Vec<_>>().join(", "))
            ));
        }

        if !report.failures.is_empty() {
            output.push_str("\n## Failed candidates\n\n");
            for failure in &report.failures {
                output.push_str(&format!("- **{}** ({}): {}\n", failure.name, failure.id, failure.error));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Render `report` in `format`
pub fn render_report(report: &RankingReport, format: OutputFormat, use_colors: bool, top_n: Option<usize>) -> Result<String> {
    match format {
        OutputFormat::Console => ConsoleFormatter::new(use_colors, top_n).format_report(report),
        OutputFormat::Json => JsonFormatter::new(true).format_report(report),
        OutputFormat::Markdown => MarkdownFormatter::new(top_n).format_report(report),
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content).map_err(|e| {
        RankerError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{CandidateFailure, CandidateResult};
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::PathBuf;

    fn report() -> RankingReport {
        let result = |id: &str, total: f64| CandidateResult {
            id: id.to_string(),
            name: format!("Name|{}", id),
            total_score: total,
            lexical_score: total - 1.0,
            semantic_score: 1.0,
            matched_skills: ["React".to_string()].into_iter().collect::<BTreeSet<_>>(),
            cluster_scores: [("Frontend".to_string(), 1)].into_iter().collect::<BTreeMap<_, _>>(),
            resume_file_path: PathBuf::from(format!("{}.txt", id)),
        };
        RankingReport {
            results: vec![result("a", 12.0), result("b", 7.5)],
            failures: vec![CandidateFailure {
                id: "c".into(),
                name: "Broken".into(),
                error: "Resume extraction failed".into(),
            }],
            job_count: 1,
            embedding_model: "mock".into(),
            generated_at: chrono::Utc::now(),
            elapsed_ms: 3,
        }
    }

    #[test]
    fn test_console_without_colors() {
        let text = ConsoleFormatter::new(false, Some(1)).format_report(&report()).unwrap();
        assert!(text.contains("CANDIDATE RANKING"));
        assert!(text.contains("12.00"));
        assert!(!text.contains("7.50"));
        assert!(text.contains("... and 1 more"));
        assert!(text.contains("Broken (c)"));
        assert!(text.contains("Frontend 1"));
    }

    #[test]
    fn test_json_round_trips_results() {
        let json = JsonFormatter::new(false).format_report(&report()).unwrap();
        let parsed: RankingReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.results, report().results);
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let md = MarkdownFormatter::new(None).format_report(&report()).unwrap();
        assert!(md.contains("| 1 | Name\\|a (a) | 12.00 |"));
        assert!(md.contains("## Failed candidates"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long candidate name", 8), "a very …");
    }
}
