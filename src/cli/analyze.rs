//! Analyze command implementation
//!
//! Flow:
//! 1. Resolve the scan root and load `codestat.toml`
//! 2. Merge config defaults under the CLI flags
//! 3. Discover files
//! 4. Run the LOC, file, TODO, git and deps analyses concurrently
//! 5. Score, render and write the report

use crate::analysis::{analyze_files, analyze_loc, analyze_todos};
use crate::config::{load_project_config, ProjectConfig};
use crate::deps::analyze_deps;
use crate::discovery::{discover, DiscoveryOptions, SourceFiles};
use crate::git;
use crate::models::{
    DepsSummary, FileAnalysisResult, FileRecord, LocResult, Report, TodoResult, VcsSummary,
};
use crate::reporters::{self, OutputFormat};
use crate::scoring::calculate_health_score;

use super::DEFAULT_WORKERS;
use anyhow::{Context, Result};
use chrono::Utc;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Flags accepted by `codestat analyze`. Unset options fall back to
/// `[defaults]` in codestat.toml, then to the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub ignore: Vec<String>,
    pub languages: Vec<String>,
    pub top: Option<usize>,
    pub todo_top: Option<usize>,
    pub no_git: bool,
    pub check_outdated: bool,
}

/// Settings after merging CLI flags with project config
#[derive(Debug, Clone)]
struct AnalysisConfig {
    format: OutputFormat,
    top: usize,
    todo_top: usize,
    workers: usize,
    no_git: bool,
    check_outdated: bool,
    discovery: DiscoveryOptions,
}

/// Run the analyze command
pub fn run(path: &Path, options: AnalyzeOptions, workers: usize) -> Result<()> {
    let start_time = Instant::now();

    let repo_path = setup_environment(path)?;
    let project_config = load_project_config(&repo_path);
    let config = apply_config_defaults(&options, workers, &project_config)?;
    let quiet = config.format == OutputFormat::Json;

    if !quiet {
        println!(
            "\n{}Analyzing: {}\n",
            style("📊 ").bold(),
            style(repo_path.display()).cyan()
        );
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .context("Failed to build worker pool")?;
    let report = pool.install(|| build_report(&repo_path, &config, quiet))?;

    let color = use_color(options.output.as_deref());
    let rendered = reporters::report_with_format(&report, config.format, color)?;
    format_and_output(&rendered, options.output.as_deref())?;

    if !quiet {
        println!(
            "{}Analysis completed in {:.2}s",
            style("✨ ").bold(),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Validate the scan root and return its canonical path.
fn setup_environment(path: &Path) -> Result<PathBuf> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Repository path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    Ok(repo_path)
}

/// Apply `[defaults]` from codestat.toml. CLI flags always win.
fn apply_config_defaults(
    options: &AnalyzeOptions,
    workers: usize,
    project_config: &ProjectConfig,
) -> Result<AnalysisConfig> {
    let defaults = &project_config.defaults;

    let format = match options.format.as_deref().or(defaults.format.as_deref()) {
        Some(name) => OutputFormat::from_str(name)?,
        None => OutputFormat::Text,
    };

    // The CLI default is indistinguishable from an explicit `--workers 8`.
    let workers = match defaults.workers {
        Some(w) if workers == DEFAULT_WORKERS => w.clamp(1, 64),
        _ => workers,
    };

    let mut exclude = project_config.exclude.effective_patterns();
    for pattern in &options.ignore {
        let pattern = pattern.trim();
        if !pattern.is_empty() && !exclude.iter().any(|p| p == pattern) {
            exclude.push(pattern.to_string());
        }
    }

    Ok(AnalysisConfig {
        format,
        top: options.top.or(defaults.top).unwrap_or(0),
        todo_top: options.todo_top.or(defaults.todo_top).unwrap_or(0),
        workers,
        no_git: options.no_git || defaults.no_git.unwrap_or(false),
        check_outdated: options.check_outdated || defaults.check_outdated.unwrap_or(false),
        discovery: DiscoveryOptions {
            exclude,
            languages: options.languages.clone(),
        },
    })
}

fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(create_spinner_style());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Discover files and run every analysis. Must be called inside the
/// worker pool so the analyzers' parallel iterators use it.
fn build_report(repo_path: &Path, config: &AnalysisConfig, quiet: bool) -> Result<Report> {
    let discovery_spinner = spinner(quiet, "Discovering source files...");
    let files = discover(repo_path, &config.discovery)?;
    if files.is_empty() {
        discovery_spinner.finish_and_clear();
        anyhow::bail!("No files found to analyze");
    }
    discovery_spinner.finish_with_message(format!(
        "{}Found {} source files",
        style("✓ ").green(),
        style(files.len()).cyan()
    ));

    let analysis_spinner = spinner(quiet, "Analyzing files...");
    let provider = SourceFiles::new();
    let (loc, file_stats, todos, vcs, deps) = run_analyses(repo_path, &files, &provider, config);
    debug!("Read {} distinct files", provider.cached_len());
    analysis_spinner.finish_with_message(format!(
        "{}Analyzed {} lines of code",
        style("✓ ").green(),
        style(loc.totals.total).cyan()
    ));

    let health = calculate_health_score(&loc, &file_stats, &todos, &vcs, &deps);
    info!("Health score {} ({})", health.score, health.grade);

    Ok(Report {
        project_name: project_name(repo_path),
        generated_at: Utc::now(),
        loc,
        files: file_stats,
        todos,
        git: vcs,
        deps,
        health,
    })
}

/// The five analyses share nothing but the file list and the content
/// cache, so they run side by side.
fn run_analyses(
    repo_path: &Path,
    files: &[FileRecord],
    provider: &SourceFiles,
    config: &AnalysisConfig,
) -> (
    LocResult,
    FileAnalysisResult,
    TodoResult,
    VcsSummary,
    DepsSummary,
) {
    let mut loc = LocResult::default();
    let mut file_stats = FileAnalysisResult::default();
    let mut todos = TodoResult::default();
    let mut vcs = VcsSummary::default();
    let mut deps = DepsSummary::default();

    rayon::scope(|s| {
        s.spawn(|_| loc = analyze_loc(files, provider));
        s.spawn(|_| file_stats = analyze_files(files, provider, config.top));
        s.spawn(|_| todos = analyze_todos(files, provider, config.todo_top));
        if !config.no_git {
            s.spawn(|_| vcs = git::summarize(repo_path, config.top));
        }
        s.spawn(|_| deps = analyze_deps(repo_path, config.check_outdated));
    });

    (loc, file_stats, todos, vcs, deps)
}

fn project_name(repo_path: &Path) -> String {
    repo_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo_path.display().to_string())
}

/// Colors only for a terminal stdout; files and pipes get plain text.
fn use_color(output: Option<&Path>) -> bool {
    output.is_none() && console::colors_enabled()
}

/// Write to `output` if given, otherwise print to stdout.
fn format_and_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{}Report written to: {}",
                style("📄 ").bold(),
                style(path.display()).cyan()
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
