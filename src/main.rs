//! resume-ranker: rank candidate resumes against role skill profiles and job descriptions

use clap::Parser;
use colored::Colorize;
use log::{error, info};
use resume_ranker::analysis::{analyze_against_job, check_resume_quality, generate_interview_questions};
use resume_ranker::cli::{self, CacheAction, Cli, Commands, ConfigAction};
use resume_ranker::config::{Config, FailurePolicy};
use resume_ranker::embedding::{self, cache::read_snapshot, CallPolicy, EmbeddingCache};
use resume_ranker::input::InputManager;
use resume_ranker::output::{render_report, save_report_to_file};
use resume_ranker::pipeline::{load_manifest, CandidatePipeline};
use resume_ranker::scoring::LineScorer;
use resume_ranker::{RankerError, Result, SkillCatalog};
use std::collections::BTreeSet;
use std::path::Path;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Rank {
            candidates,
            job,
            concurrency,
            output,
            save,
            isolate_failures,
        } => {
            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(RankerError::InvalidInput)?,
                None => config.output.format,
            };
            let failure_policy = if isolate_failures {
                FailurePolicy::Isolate
            } else {
                config.pipeline.failure_policy
            };
            let limit = concurrency.unwrap_or(config.pipeline.concurrency_limit);

            let records = load_manifest(&candidates)?;
            info!("Loaded {} candidates from {}", records.len(), candidates.display());

            let input = InputManager::new();
            let mut job_descriptions = Vec::with_capacity(job.len());
            for path in &job {
                cli::validate_file_extension(path, &["pdf", "txt", "md", "markdown"])
                    .map_err(|e| RankerError::InvalidInput(format!("Job description file: {}", e)))?;
                job_descriptions.push(input.extract_text(path).await?);
            }

            let pipeline = build_pipeline(&config, failure_policy).await?;
            let report = pipeline.rank_candidates(&records, &job_descriptions, limit).await?;

            let use_colors = config.output.color_output && save.is_none();
            let rendered = render_report(&report, format, use_colors, config.output.top_n)?;
            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)?;
                    println!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Quality { resume } => {
            let text = InputManager::new().extract_text(&resume).await?;
            let report = check_resume_quality(&text);

            println!("{} {}", "Resume quality:".bold(), score_colored(report.score as u32));
            println!("Estimated pages: {}", report.pages);
            if report.improvements.is_empty() {
                println!("No issues found.");
            } else {
                println!("\nSuggested improvements:");
                for improvement in &report.improvements {
                    println!("  • {}", improvement);
                }
            }
        }

        Commands::Match { resume, job } => {
            let input = InputManager::new();
            let resume_text = input.extract_text(&resume).await?;
            let job_text = input.extract_text(&job).await?;
            let report = analyze_against_job(&resume_text, &job_text);

            println!("{} {}", "Keyword match:".bold(), score_colored(report.match_percent));
            println!("\n{} ({})", "Found".green(), report.found.len());
            for keyword in &report.found {
                println!("  ✓ {}", keyword);
            }
            println!("\n{} ({})", "Missing".red(), report.missing.len());
            for keyword in &report.missing {
                println!("  ✗ {}", keyword);
            }
        }

        Commands::Questions { job, limit } => {
            let job_text = InputManager::new().extract_text(&job).await?;
            for (i, question) in generate_interview_questions(&job_text, limit).iter().enumerate() {
                println!("{:>2}. {}", i + 1, question.question);
            }
        }

        Commands::Catalog { role } => {
            let catalog = SkillCatalog::from_optional_path(config.catalog_path.as_deref())?;
            let roles: Vec<&str> = match &role {
                Some(name) => {
                    if catalog.role(name).is_none() {
                        return Err(RankerError::InvalidInput(format!(
                            "Unknown role '{}'. Known roles: {}",
                            name,
                            catalog.role_names().join(", ")
                        )));
                    }
                    vec![name.as_str()]
                }
                None => catalog.role_names(),
            };

            for name in roles {
                if let Some(profile) = catalog.role(name) {
                    println!("{}", name.bold());
                    for (skill, weight) in profile.skills() {
                        let aliases = catalog
                            .aliases()
                            .get(skill)
                            .map(|a| format!(" ({})", a.join(", ")))
                            .unwrap_or_default();
                        println!("  {:<20} {}{}", skill, weight, aliases);
                    }
                }
            }

            if role.is_none() {
                println!("\n{}", "Clusters".bold());
                for (cluster, skills) in catalog.clusters() {
                    println!("  {:<16} {}", cluster, skills.join(", "));
                }
                println!("\n{} {}", "Action verbs:".bold(), catalog.action_verbs().join(", "));
            }
        }

        Commands::Cache { action } => {
            let path = &config.embedding.cache_path;
            match action {
                CacheAction::Stats => {
                    let entries = read_snapshot(path)?;
                    let dimensions: BTreeSet<usize> = entries.values().map(Vec::len).collect();
                    println!("Cache file: {}", path.display());
                    println!("Entries: {}", entries.len());
                    if !dimensions.is_empty() {
                        let dims: Vec<String> = dimensions.iter().map(|d| d.to_string()).collect();
                        println!("Dimensions: {}", dims.join(", "));
                    }
                }
                CacheAction::Clear => {
                    if path.exists() {
                        std::fs::remove_file(path)?;
                        println!("Removed {}", path.display());
                    } else {
                        println!("No cache at {}", path.display());
                    }
                }
            }
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| RankerError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
            }
            ConfigAction::Reset => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset: {}", config_path.display());
            }
            ConfigAction::Path => println!("{}", config_path.display()),
        },
    }

    Ok(())
}

async fn build_pipeline(config: &Config, failure_policy: FailurePolicy) -> Result<CandidatePipeline> {
    let catalog = Arc::new(SkillCatalog::from_optional_path(config.catalog_path.as_deref())?);
    let scorer = Arc::new(LineScorer::new(catalog, &config.scoring));

    info!("Loading embedding model: {}", config.embedding.model);
    let embedder = embedding::from_config(&config.embedding).await?;
    let cache = Arc::new(EmbeddingCache::load(
        &config.embedding.cache_path,
        embedder,
        CallPolicy::from_config(&config.embedding),
    ));

    Ok(CandidatePipeline::new(scorer, cache, &config.scoring).with_failure_policy(failure_policy))
}

fn score_colored(percent: u32) -> colored::ColoredString {
    let text = format!("{}%", percent);
    match percent {
        80.. => text.green().bold(),
        60..=79 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}
