//! CLI interface for the resume ranker

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Rank candidate resumes against role skill profiles and job descriptions")]
#[command(long_about = "Score resumes line by line against weighted role skills, add an embedding similarity bonus per job description and rank candidates concurrently")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank the candidates of a manifest
    Rank {
        /// Candidate manifest (JSON or TOML)
        #[arg(long)]
        candidates: PathBuf,

        /// Job description file(s) (TXT, MD, PDF)
        #[arg(short, long, required = true, num_args = 1..)]
        job: Vec<PathBuf>,

        /// Resumes processed at the same time
        #[arg(short = 'n', long)]
        concurrency: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Report failed candidates instead of aborting the run
        #[arg(long)]
        isolate_failures: bool,
    },

    /// Check a resume for structure and formatting problems
    Quality {
        #[arg(short, long)]
        resume: PathBuf,
    },

    /// Compare a resume against the keywords of a job description
    Match {
        #[arg(short, long)]
        resume: PathBuf,

        #[arg(short, long)]
        job: PathBuf,
    },

    /// Generate interview questions from a job description
    Questions {
        #[arg(short, long)]
        job: PathBuf,

        /// Number of questions
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show the skill catalog
    Catalog {
        /// Show a single role
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Embedding cache management
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Show the number of cached embeddings and their dimensions
    Stats,

    /// Delete the cache file
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
